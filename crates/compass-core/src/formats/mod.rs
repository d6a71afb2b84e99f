//! # Serialization Formats
//!
//! Byte-level formats for Compass data. Pure transformations; file and
//! database I/O live in the storage module and the app layer.

pub mod persistence;

pub use persistence::{PersistenceHeader, state_from_bytes, state_to_bytes};
