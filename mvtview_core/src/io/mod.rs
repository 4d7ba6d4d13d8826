//! Readers and writers for protobuf-encoded values.
//!
//! # Overview
//!
//! [`ValueReader`] decodes varints, zigzag varints, fixed-width numbers and protobuf keys from a
//! source, [`ValueReaderSlice`] is its implementation over a borrowed byte slice and additionally
//! hands out zero-copy sub-slices that live as long as the input buffer.
//! [`ValueWriter`] and [`ValueWriterBlob`] are the mirror image used to encode tiles.
//!
//! # Examples
//!
//! ```rust
//! use mvtview_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut writer = ValueWriterBlob::new_le();
//!     writer.write_pbf_key(1, 2)?;
//!     writer.write_pbf_string("roads")?;
//!     let blob = writer.into_blob();
//!
//!     let mut reader = ValueReaderSlice::new_le(blob.as_slice());
//!     assert_eq!(reader.read_pbf_key()?, (1, 2));
//!     assert_eq!(reader.read_pbf_str()?, "roads");
//!     Ok(())
//! }
//! ```

mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
