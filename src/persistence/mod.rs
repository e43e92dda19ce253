//! Save/load of whole simulation states
//!
//! Features:
//! - Versioned JSON envelope with camelCase metadata
//! - Little-endian element buffers
//! - Buffer size validation before any grid is built
//! - Resizing a snapshot into a grid of different dimensions

pub mod snapshot;

pub use snapshot::{CURRENT_FORMAT_VERSION, Snapshot, SnapshotError, SnapshotMetadata};
