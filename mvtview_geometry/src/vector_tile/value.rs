//! Property values of the layer value table.
//!
//! The `Value` message of the MVT schema:
//!  * field 1: `string_value` (string)
//!  * field 2: `float_value` (fixed32)
//!  * field 3: `double_value` (fixed64)
//!  * field 4: `int_value` (varint)
//!  * field 5: `uint_value` (varint)
//!  * field 6: `sint_value` (zigzag varint)
//!  * field 7: `bool_value` (varint)

use super::error::{Result, VectorTileError};
use anyhow::Context;
use byteorder::LE;
use mvtview_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};
use std::fmt::Display;

/// A decoded property value. String values borrow from the tile buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue<'a> {
	String(&'a str),
	Float(f32),
	Double(f64),
	Int(i64),
	UInt(u64),
	SInt(i64),
	Bool(bool),
}

impl<'a> PropertyValue<'a> {
	/// Decodes a `Value` message.
	///
	/// Unknown fields are skipped. If several value fields are present the last one wins.
	///
	/// # Errors
	/// Returns [`VectorTileError::Format`] if the encoding is malformed or no value field is present.
	pub fn read(data: &'a [u8]) -> Result<PropertyValue<'a>> {
		use PropertyValue::*;

		let mut reader = ValueReaderSlice::new_le(data);
		let mut value: Option<PropertyValue<'a>> = None;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => value = Some(String(reader.read_pbf_str().context("Failed to read string value")?)),
				(2, 5) => value = Some(Float(reader.read_f32().context("Failed to read float value")?)),
				(3, 1) => value = Some(Double(reader.read_f64().context("Failed to read double value")?)),
				(4, 0) => {
					#[allow(clippy::cast_possible_wrap)] // int64 is transmitted as two's complement
					let v = reader.read_varint().context("Failed to read int value")? as i64;
					value = Some(Int(v));
				}
				(5, 0) => value = Some(UInt(reader.read_varint().context("Failed to read uint value")?)),
				(6, 0) => value = Some(SInt(reader.read_svarint().context("Failed to read sint value")?)),
				(7, 0) => value = Some(Bool(reader.read_varint().context("Failed to read bool value")? != 0)),
				(_, w) => reader.skip_pbf_field(w).context("Failed to skip unknown value field")?,
			}
		}

		value.ok_or_else(|| VectorTileError::format("property value without any value field"))
	}

	/// Encodes this value as a `Value` message.
	///
	/// # Errors
	/// Returns an error if writing fails.
	pub fn to_blob(&self) -> anyhow::Result<Blob> {
		let mut writer = ValueWriterBlob::<LE>::new_le();

		match self {
			PropertyValue::String(s) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			PropertyValue::Float(f) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*f).context("Failed to write float value")?;
			}
			PropertyValue::Double(f) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			PropertyValue::Int(i) => {
				writer.write_pbf_key(4, 0)?;
				#[allow(clippy::cast_sign_loss)]
				let v = *i as u64;
				writer.write_varint(v).context("Failed to write int value")?;
			}
			PropertyValue::UInt(u) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*u).context("Failed to write uint value")?;
			}
			PropertyValue::SInt(i) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*i).context("Failed to write sint value")?;
			}
			PropertyValue::Bool(b) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*b)).context("Failed to write bool value")?;
			}
		}

		Ok(writer.into_blob())
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&'a str> {
		match self {
			PropertyValue::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the value as `f64` for any numeric variant.
	#[must_use]
	#[allow(clippy::cast_precision_loss)]
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			PropertyValue::Float(f) => Some(f64::from(*f)),
			PropertyValue::Double(f) => Some(*f),
			PropertyValue::Int(i) | PropertyValue::SInt(i) => Some(*i as f64),
			PropertyValue::UInt(u) => Some(*u as f64),
			_ => None,
		}
	}

	/// Returns the value as `i64` for integer variants that fit.
	#[must_use]
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			PropertyValue::Int(i) | PropertyValue::SInt(i) => Some(*i),
			PropertyValue::UInt(u) => i64::try_from(*u).ok(),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			PropertyValue::Bool(b) => Some(*b),
			_ => None,
		}
	}
}

impl<'a> From<&'a str> for PropertyValue<'a> {
	fn from(value: &'a str) -> Self {
		PropertyValue::String(value)
	}
}

impl From<bool> for PropertyValue<'_> {
	fn from(value: bool) -> Self {
		PropertyValue::Bool(value)
	}
}

impl From<u64> for PropertyValue<'_> {
	fn from(value: u64) -> Self {
		PropertyValue::UInt(value)
	}
}

impl From<i64> for PropertyValue<'_> {
	fn from(value: i64) -> Self {
		PropertyValue::SInt(value)
	}
}

impl From<f64> for PropertyValue<'_> {
	fn from(value: f64) -> Self {
		PropertyValue::Double(value)
	}
}

impl From<f32> for PropertyValue<'_> {
	fn from(value: f32) -> Self {
		PropertyValue::Float(value)
	}
}

impl Display for PropertyValue<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PropertyValue::String(v) => write!(f, "{v}"),
			PropertyValue::Float(v) => write!(f, "{v}"),
			PropertyValue::Double(v) => write!(f, "{v}"),
			PropertyValue::Int(v) | PropertyValue::SInt(v) => write!(f, "{v}"),
			PropertyValue::UInt(v) => write!(f, "{v}"),
			PropertyValue::Bool(v) => write!(f, "{v}"),
		}
	}
}
