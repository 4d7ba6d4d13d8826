//! [`ValueWriterBlob`] writes values into a growable in-memory buffer and hands it out as a
//! [`Blob`].
//!
//! ```rust
//! use mvtview_core::io::{ValueWriter, ValueWriterBlob};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut writer = ValueWriterBlob::new_le();
//!     writer.write_varint(1025)?;
//!     assert_eq!(writer.into_blob().into_vec(), vec![0b10000001, 0b00001000]);
//!     Ok(())
//! }
//! ```

use super::ValueWriter;
use crate::types::Blob;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::{io::Write, marker::PhantomData};

/// In-memory [`ValueWriter`]. Protobuf messages use [`ValueWriterBlob::new_le`].
#[derive(Debug)]
pub struct ValueWriterBlob<E: ByteOrder> {
	_phantom: PhantomData<E>,
	buffer: Vec<u8>,
}

impl<E: ByteOrder> ValueWriterBlob<E> {
	#[must_use]
	pub fn new() -> ValueWriterBlob<E> {
		ValueWriterBlob::with_capacity(0)
	}

	#[must_use]
	pub fn with_capacity(capacity: usize) -> ValueWriterBlob<E> {
		ValueWriterBlob {
			_phantom: PhantomData,
			buffer: Vec::with_capacity(capacity),
		}
	}

	/// Number of bytes written so far.
	#[must_use]
	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	#[must_use]
	pub fn into_blob(self) -> Blob {
		Blob::from(self.buffer)
	}
}

impl ValueWriterBlob<LittleEndian> {
	#[must_use]
	pub fn new_le() -> ValueWriterBlob<LittleEndian> {
		ValueWriterBlob::new()
	}
}

impl ValueWriterBlob<BigEndian> {
	#[must_use]
	pub fn new_be() -> ValueWriterBlob<BigEndian> {
		ValueWriterBlob::new()
	}
}

impl<E: ByteOrder> ValueWriter<E> for ValueWriterBlob<E> {
	fn get_writer(&mut self) -> &mut dyn Write {
		&mut self.buffer
	}
}

impl<E: ByteOrder> Default for ValueWriterBlob<E> {
	fn default() -> Self {
		Self::new()
	}
}
