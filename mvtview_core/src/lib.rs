//! Byte-level building blocks for reading and writing protobuf-encoded vector tiles.
//!
//! [`io`] contains the value readers and writers, [`types`] the owned [`Blob`] buffer.

pub mod io;

pub mod types;

pub use types::*;
