//! This module provides the `ValueReaderSlice` struct for reading values from a borrowed byte slice.
//!
//! # Overview
//!
//! `ValueReaderSlice` implements [`ValueReader`] on top of a `Cursor<&[u8]>`. Besides the trait
//! methods it offers zero-copy accessors (`read_slice`, `read_pbf_slice`, `read_pbf_str`, ...)
//! whose results borrow from the original buffer with its full lifetime `'a`, not from the reader.
//! That is what lets layers and features be views into the caller's tile buffer.
//!
//! # Examples
//!
//! ```rust
//! use mvtview_core::io::{ValueReader, ValueReaderSlice};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let data = vec![0x1A, 0x03, b'k', b'e', b'y'];
//!     let key = {
//!         let mut reader = ValueReaderSlice::new_le(&data);
//!         assert_eq!(reader.read_pbf_key()?, (3, 2));
//!         reader.read_pbf_str()?
//!     };
//!     assert_eq!(key, "key");
//!     Ok(())
//! }
//! ```

use super::{SeekRead, ValueReader};
use anyhow::{Context, Result, anyhow, bail};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::{io::Cursor, marker::PhantomData};

/// A struct that provides reading capabilities from a byte slice using a specified byte order.
#[derive(Clone, Debug)]
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a, E: ByteOrder + 'a> ValueReaderSlice<'a, E> {
	/// Creates a new `ValueReaderSlice` from a byte slice.
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}

	/// Returns the complete slice this reader was created from.
	#[must_use]
	pub fn as_slice(&self) -> &'a [u8] {
		*self.cursor.get_ref()
	}

	/// Reads `length` bytes as a view into the underlying buffer.
	///
	/// # Errors
	/// Returns an error if fewer than `length` bytes remain.
	pub fn read_slice(&mut self, length: u64) -> Result<&'a [u8]> {
		let start = self.cursor.position();
		let end = start
			.checked_add(length)
			.ok_or_else(|| anyhow!("slice length overflows"))?;
		if end > self.len {
			bail!("Requested {length} bytes, but only {} remaining", self.len - start);
		}
		let slice: &'a [u8] = *self.cursor.get_ref();
		let view = slice
			.get(usize::try_from(start)?..usize::try_from(end)?)
			.ok_or_else(|| anyhow!("out of bounds"))?;
		self.cursor.set_position(end);
		Ok(view)
	}

	/// Reads a length-delimited field payload as a view into the underlying buffer.
	///
	/// # Errors
	/// Returns an error if the length varint is malformed or the payload is truncated.
	pub fn read_pbf_slice(&mut self) -> Result<&'a [u8]> {
		let length = self.read_varint().context("Failed to read varint for slice length")?;
		self.read_slice(length).context("Failed to read PBF slice")
	}

	/// Reads a length-delimited UTF-8 string as a view into the underlying buffer.
	///
	/// # Errors
	/// Returns an error if the payload is truncated or not valid UTF-8.
	pub fn read_pbf_str(&mut self) -> Result<&'a str> {
		let slice = self.read_pbf_slice()?;
		std::str::from_utf8(slice).context("PBF string is not valid UTF-8")
	}

	/// Reads a length-delimited embedded message and returns a reader over just that message.
	///
	/// The returned reader borrows the buffer, not `self`.
	///
	/// # Errors
	/// Returns an error if the length varint is malformed or the payload is truncated.
	pub fn read_pbf_sub_slice_reader(&mut self) -> Result<ValueReaderSlice<'a, E>> {
		Ok(ValueReaderSlice::new(self.read_pbf_slice()?))
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	/// Creates a new `ValueReaderSlice` with little-endian byte order, the byte order of protobuf.
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a> ValueReaderSlice<'a, BigEndian> {
	/// Creates a new `ValueReaderSlice` with big-endian byte order.
	#[must_use]
	pub fn new_be(slice: &'a [u8]) -> ValueReaderSlice<'a, BigEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl SeekRead for Cursor<&[u8]> {}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn get_reader(&mut self) -> &mut dyn SeekRead {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.len
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		if position > self.len {
			bail!("set position outside length")
		}
		self.cursor.set_position(position);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_len() -> Result<()> {
		let reader = ValueReaderSlice::new_le(&[0x80; 42]);
		assert_eq!(reader.len(), 42);
		Ok(())
	}

	#[test]
	fn test_read_varint_too_long() -> Result<()> {
		let blob = vec![0x80; 11];
		let mut reader = ValueReaderSlice::new_le(&blob);
		assert!(reader.read_varint().is_err());
		Ok(())
	}

	#[test]
	fn test_set_and_get_position() -> Result<()> {
		let blob = vec![0x01, 0x02, 0x03, 0x04];
		let mut reader = ValueReaderSlice::new_le(&blob);
		reader.set_position(2)?;
		assert_eq!(reader.position(), 2);
		assert_eq!(reader.read_varint()?, 0x03);
		reader.set_position(4)?;
		assert!(!reader.has_remaining());
		assert!(reader.set_position(5).is_err());
		Ok(())
	}

	#[test]
	fn test_read_slice_borrows_buffer() -> Result<()> {
		let buf = vec![0x03, 0x0A, 0x0B, 0x0C, 0xFF];
		let slice = {
			let mut reader = ValueReaderSlice::new_le(&buf);
			reader.read_pbf_slice()?
		};
		assert_eq!(slice, &[0x0A, 0x0B, 0x0C]);
		assert!(std::ptr::eq(slice.as_ptr(), buf[1..].as_ptr()));
		Ok(())
	}

	#[test]
	fn test_read_pbf_str() -> Result<()> {
		let mut reader = ValueReaderSlice::new_le(&[0x02, b'o', b'k', 0x02, 0xC3, 0x28]);
		assert_eq!(reader.read_pbf_str()?, "ok");
		assert!(reader.read_pbf_str().is_err());
		Ok(())
	}

	#[test]
	fn test_read_pbf_sub_slice_reader() -> Result<()> {
		let buf = vec![0x02, 0x08, 0x07, 0x2A];
		let mut reader = ValueReaderSlice::new_le(&buf);
		let mut sub = reader.read_pbf_sub_slice_reader()?;
		assert_eq!(reader.read_varint()?, 0x2A);
		assert_eq!(sub.read_pbf_key()?, (1, 0));
		assert_eq!(sub.read_varint()?, 7);
		assert!(!sub.has_remaining());
		Ok(())
	}
}
