//! Port trait definitions
//!
//! These traits define the interfaces that data-access adapters must implement.

pub mod source;

pub use source::EntitySource;
