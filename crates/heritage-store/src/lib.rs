//! Heritage Store - Entity source adapters
//!
//! Implementations of the `EntitySource` port over in-memory collections and
//! JSON payloads exported by the records API.

pub mod json;
pub mod memory;
pub mod payload;

pub use json::JsonFileSource;
pub use memory::MemoryEntitySource;
pub use payload::{parse_archives, parse_workshops, ArchiveRecord, ListResponse, WorkshopRecord};
