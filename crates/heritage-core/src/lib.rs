//! Heritage Core - Domain models, errors, and configuration
//!
//! This crate contains the entity model shared by the map engine and the
//! similarity ranker, together with the read-side port used to obtain entities.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{HeritageError, Result};
