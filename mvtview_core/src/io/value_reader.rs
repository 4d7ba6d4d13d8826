// This module defines the `ValueReader` trait for reading protobuf-encoded values.
//
// # Overview
//
// The `ValueReader` trait provides an interface for reading varints, zigzag varints, fixed-width
// numbers and Protocol Buffers framing (keys, skipping of unknown fields) from a source. Implementations choose the byte order used for fixed-width
// numbers through the `E: ByteOrder` parameter; protobuf itself is always little-endian.
//
// # Examples
//
// ```rust
// use mvtview_core::io::{ValueReader, ValueReaderSlice};
//
// fn main() -> anyhow::Result<()> {
//     let mut reader = ValueReaderSlice::new_le(&[0x08, 0x96, 0x01]);
//     assert_eq!(reader.read_pbf_key()?, (1, 0));
//     assert_eq!(reader.read_varint()?, 150);
//     Ok(())
// }
// ```

use anyhow::{Context, Result, bail};
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{Read, Seek};

/// A simple alias for types implementing both `Seek` and `Read`, used for convenience.
pub trait SeekRead: Seek + Read {}

/// A trait for reading values from various sources with support for different byte orders.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	/// Returns the underlying reader to access raw bytes.
	fn get_reader(&mut self) -> &mut dyn SeekRead;

	/// Returns the total length of the readable data.
	fn len(&self) -> u64;

	/// Returns the current position within the readable data.
	fn position(&mut self) -> u64;

	/// Sets the current position within the readable data.
	///
	/// Setting the position to `len()` is allowed and marks the reader as exhausted.
	///
	/// # Errors
	/// Returns an error if `position` lies beyond the end of the data.
	fn set_position(&mut self, position: u64) -> Result<()>;

	/// Checks if there is no data to read.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of bytes remaining to be read.
	fn remaining(&mut self) -> u64 {
		self.len() - self.position()
	}

	/// Checks if there are any bytes remaining to be read.
	fn has_remaining(&mut self) -> bool {
		self.remaining() > 0
	}

	/// Reads a variable-length unsigned integer (varint) from the data.
	///
	/// # Errors
	/// Returns an error if the data ends inside the varint or the varint is longer than ten bytes.
	fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.get_reader().read_u8().context("Unexpected end of data inside varint")?;
			value |= (u64::from(byte) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("Varint too long");
			}
		}
		Ok(value)
	}

	/// Reads a variable-length signed integer (zigzag-encoded varint) from the data.
	///
	/// # Errors
	/// Returns an error if reading the underlying varint fails.
	fn read_svarint(&mut self) -> Result<i64> {
		let value = self.read_varint()?;
		Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
	}

	/// Reads a 32-bit floating point number from the data.
	///
	/// # Errors
	/// Returns an error if fewer than four bytes remain.
	fn read_f32(&mut self) -> Result<f32> {
		Ok(self.get_reader().read_f32::<E>()?)
	}

	/// Reads a 64-bit floating point number from the data.
	///
	/// # Errors
	/// Returns an error if fewer than eight bytes remain.
	fn read_f64(&mut self) -> Result<f64> {
		Ok(self.get_reader().read_f64::<E>()?)
	}

	/// Advances the position by `length` bytes without reading them.
	///
	/// # Errors
	/// Returns an error if fewer than `length` bytes remain.
	fn skip(&mut self, length: u64) -> Result<()> {
		if length > self.remaining() {
			bail!("Cannot skip {length} bytes, only {} remaining", self.remaining());
		}
		let position = self.position() + length;
		self.set_position(position)
	}

	/// Reads a Protocol Buffers key consisting of a field number and wire type.
	///
	/// # Returns
	/// A tuple `(field_number, wire_type)`.
	///
	/// # Errors
	/// Returns an error if reading the varint fails or the field number does not fit into 32 bits.
	fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		let field_number = u32::try_from(value >> 3).context("PBF field number out of range")?;
		Ok((field_number, (value & 0x07) as u8))
	}

	/// Skips the payload of a field whose key has already been read.
	///
	/// Supports the wire types used by proto2/proto3 messages: varint (0), 64-bit (1),
	/// length-delimited (2) and 32-bit (5).
	///
	/// # Errors
	/// Returns an error for group or unknown wire types, or if the payload is truncated.
	fn skip_pbf_field(&mut self, wire_type: u8) -> Result<()> {
		match wire_type {
			0 => self.read_varint().map(|_| ()).context("Failed to skip varint field"),
			1 => self.skip(8).context("Failed to skip 64-bit field"),
			2 => {
				let length = self.read_varint().context("Failed to read length of skipped field")?;
				self.skip(length).context("Failed to skip length-delimited field")
			}
			5 => self.skip(4).context("Failed to skip 32-bit field"),
			w => bail!("Unsupported wire type ({w})"),
		}
	}
}
