//! The [`ValueWriter`] trait, encoding the protobuf values a vector tile is made of.
//!
//! It mirrors [`super::ValueReader`]. Implementors only hand out the underlying [`Write`]; all
//! encodings are provided methods.
//!
//! ```rust
//! use mvtview_core::io::{ValueWriter, ValueWriterBlob};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut writer = ValueWriterBlob::new_le();
//!     writer.write_pbf_key(4, 2)?;
//!     writer.write_pbf_packed_uint32(&[9, 50, 34])?;
//!     assert_eq!(writer.into_blob().into_vec(), vec![0x22, 0x03, 9, 50, 34]);
//!     Ok(())
//! }
//! ```

use crate::Blob;
use anyhow::{Context, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use std::io::Write;

/// Number of bytes `value` occupies as a varint.
#[must_use]
pub const fn varint_len(value: u64) -> u64 {
	let bits = 64 - (value | 1).leading_zeros() as u64;
	bits.div_ceil(7)
}

/// Writes varints, fixed-width numbers and protobuf framing to a destination.
pub trait ValueWriter<E: ByteOrder> {
	fn get_writer(&mut self) -> &mut dyn Write;

	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_varint(&mut self, mut value: u64) -> Result<()> {
		let mut buffer = [0u8; 10];
		let mut length = 0;
		while value >= 0x80 {
			buffer[length] = ((value & 0x7F) as u8) | 0x80;
			value >>= 7;
			length += 1;
		}
		buffer[length] = value as u8;
		self
			.get_writer()
			.write_all(&buffer[..=length])
			.context("Failed to write varint")
	}

	/// Writes a zigzag-encoded signed varint.
	///
	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_f32(&mut self, value: f32) -> Result<()> {
		self.get_writer().write_f32::<E>(value).context("Failed to write f32")
	}

	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_f64(&mut self, value: f64) -> Result<()> {
		self.get_writer().write_f64::<E>(value).context("Failed to write f64")
	}

	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.get_writer().write_all(buf).context("Failed to write bytes")
	}

	/// Writes a field key: the field number shifted left by 3, or-ed with the wire type.
	///
	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type & 0x07))
			.context("Failed to write PBF key")
	}

	/// Writes a length-delimited payload.
	///
	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_pbf_bytes(&mut self, bytes: &[u8]) -> Result<()> {
		self
			.write_varint(bytes.len() as u64)
			.context("Failed to write length of PBF payload")?;
		self.write_slice(bytes)
	}

	/// Writes a packed repeated `uint32` field payload, e.g. feature tags or a geometry.
	///
	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let length: u64 = data.iter().map(|&value| varint_len(u64::from(value))).sum();
		self
			.write_varint(length)
			.context("Failed to write length of packed uint32")?;
		for &value in data {
			self
				.write_varint(u64::from(value))
				.context("Failed to write packed uint32")?;
		}
		Ok(())
	}

	/// Writes an embedded message that has already been encoded.
	///
	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self.write_pbf_bytes(blob.as_slice())
	}

	/// # Errors
	/// Returns an error if writing to the underlying writer fails.
	fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self.write_pbf_bytes(text.as_bytes())
	}
}
