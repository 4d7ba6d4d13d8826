//! The geometry command decoder.
//!
//! [`GeometryDecoder`] walks a stream of 32-bit integers, reading command integers and the
//! zigzag-encoded parameter pairs that follow them, and keeps the running cursor position.
//! The per-type algorithms (`decode_points`, `decode_linestrings`, `decode_polygon`) drive it and
//! enforce the structural rules of each geometry type.
//!
//! The stream is abstracted behind [`CommandStream`]: in production it is the packed varint
//! payload of a feature, in tests it can be a plain `&[u32]`.

use super::{
	command::{CLOSE_PATH, LINE_TO, MOVE_TO, command_name, decode_zigzag32, det, unpack_command},
	error::{Result, VectorTileError},
	handler::{LineStringHandler, PointHandler, PolygonHandler},
	point::Point,
};
use anyhow::Context;
use byteorder::LE;
use mvtview_core::io::{ValueReader, ValueReaderSlice};

/// A forward-only source of geometry integers.
pub trait CommandStream {
	/// Returns true when no integers are left.
	fn is_done(&mut self) -> bool;

	/// Returns the next integer, or `None` at the end of the stream.
	fn next_integer(&mut self) -> Result<Option<u32>>;

	/// Upper bound of the integers left in the stream.
	fn max_remaining(&mut self) -> u64;
}

impl CommandStream for ValueReaderSlice<'_, LE> {
	fn is_done(&mut self) -> bool {
		!self.has_remaining()
	}

	fn next_integer(&mut self) -> Result<Option<u32>> {
		if !self.has_remaining() {
			return Ok(None);
		}
		let value = self.read_varint().context("Failed to read geometry integer")?;
		Ok(Some(
			u32::try_from(value).context("Geometry integer does not fit into 32 bits")?,
		))
	}

	// every varint takes at least one byte
	fn max_remaining(&mut self) -> u64 {
		self.remaining()
	}
}

impl CommandStream for std::slice::Iter<'_, u32> {
	fn is_done(&mut self) -> bool {
		self.as_slice().is_empty()
	}

	fn next_integer(&mut self) -> Result<Option<u32>> {
		Ok(self.next().copied())
	}

	fn max_remaining(&mut self) -> u64 {
		self.len() as u64
	}
}

/// Stateful cursor over a geometry's command stream.
#[derive(Debug)]
pub struct GeometryDecoder<S> {
	stream: S,
	cursor: Point,
	command_id: u32,
	count: u32,
	strict: bool,
}

impl<'a> GeometryDecoder<ValueReaderSlice<'a, LE>> {
	/// Creates a decoder over the packed varint payload of a feature's geometry field.
	#[must_use]
	pub fn new(data: &'a [u8], strict: bool) -> Self {
		GeometryDecoder::from_stream(ValueReaderSlice::new_le(data), strict)
	}
}

impl<S: CommandStream> GeometryDecoder<S> {
	pub fn from_stream(stream: S, strict: bool) -> Self {
		GeometryDecoder {
			stream,
			cursor: Point::default(),
			command_id: 0,
			count: 0,
			strict,
		}
	}

	/// Number of points still to be read for the current command.
	pub fn count(&self) -> u32 {
		self.count
	}

	pub fn is_done(&mut self) -> bool {
		self.stream.is_done()
	}

	/// Reads the next command integer and checks that it is `expected_id`.
	///
	/// Returns `Ok(false)` if the stream is exhausted. A ClosePath must have a count of 1 and
	/// carries no parameters; for MoveTo and LineTo the count becomes the number of points to read.
	pub fn next_command(&mut self, expected_id: u32) -> Result<bool> {
		if self.count != 0 {
			return Err(VectorTileError::Precondition(format!(
				"{} points of the previous command have not been read",
				self.count
			)));
		}

		let Some(command) = self.stream.next_integer()? else {
			return Ok(false);
		};

		let (id, count) = unpack_command(command);
		self.command_id = id;
		if id == CLOSE_PATH {
			if count != 1 {
				return Err(VectorTileError::geometry("ClosePath command count is not 1"));
			}
		} else {
			self.count = count;
		}

		if id != expected_id {
			return Err(VectorTileError::geometry(format!(
				"expected command {} ({}) but got {} ({})",
				expected_id,
				command_name(expected_id),
				id,
				command_name(id)
			)));
		}

		Ok(true)
	}

	/// Reads one parameter pair, applies it to the cursor and returns the new position.
	pub fn next_point(&mut self) -> Result<Point> {
		if self.count == 0 {
			return Err(VectorTileError::Precondition(
				"no points left for the current command".to_string(),
			));
		}

		let (Some(x), Some(y)) = (self.stream.next_integer()?, self.stream.next_integer()?) else {
			return Err(VectorTileError::geometry("too few points in geometry"));
		};
		let dx = decode_zigzag32(x);
		let dy = decode_zigzag32(y);

		if self.strict && self.command_id == LINE_TO && dx == 0 && dy == 0 {
			return Err(VectorTileError::geometry(
				"found consecutive equal points (strict mode)",
			));
		}

		self.cursor = match (self.cursor.x.checked_add(dx), self.cursor.y.checked_add(dy)) {
			(Some(x), Some(y)) => Point::new(x, y),
			_ => return Err(VectorTileError::geometry("coordinate overflow in geometry")),
		};
		self.count -= 1;

		Ok(self.cursor)
	}

	/// Fails unless the stream can still hold the parameters of the current command.
	///
	/// Runs before a handler learns the count, so handlers may size buffers from it.
	fn check_count(&mut self) -> Result<()> {
		let available = self.stream.max_remaining() / 2;
		if u64::from(self.count) > available {
			return Err(VectorTileError::geometry(format!(
				"too few points in geometry ({} announced, at most {available} left)",
				self.count
			)));
		}
		Ok(())
	}

	/// Decodes a single MoveTo with one or more points, and nothing after it.
	pub fn decode_points<H: PointHandler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
		if !self.next_command(MOVE_TO)? {
			return Err(VectorTileError::geometry("expected MoveTo command"));
		}
		if self.count == 0 {
			return Err(VectorTileError::geometry("MoveTo command count is zero"));
		}
		self.check_count()?;

		handler.points_begin(self.count);
		while self.count > 0 {
			let point = self.next_point()?;
			handler.points_point(point);
		}

		if !self.is_done() {
			return Err(VectorTileError::geometry("additional data after end of geometry"));
		}

		handler.points_end();
		Ok(())
	}

	/// Decodes any number of MoveTo(1) + LineTo(n) sequences.
	pub fn decode_linestrings<H: LineStringHandler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
		while self.next_command(MOVE_TO)? {
			if self.count != 1 {
				return Err(VectorTileError::geometry("MoveTo command count is not 1"));
			}
			let first_point = self.next_point()?;

			if !self.next_command(LINE_TO)? {
				return Err(VectorTileError::geometry("expected LineTo command"));
			}
			if self.count == 0 {
				return Err(VectorTileError::geometry("LineTo command count is zero"));
			}
			self.check_count()?;

			handler.linestring_begin(self.count + 1);
			handler.linestring_point(first_point);
			while self.count > 0 {
				let point = self.next_point()?;
				handler.linestring_point(point);
			}
			handler.linestring_end();
		}
		Ok(())
	}

	/// Decodes any number of MoveTo(1) + LineTo(n) + ClosePath rings.
	///
	/// The orientation of each ring is the sign of its shoelace sum, including the closing edge.
	pub fn decode_polygon<H: PolygonHandler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
		while self.next_command(MOVE_TO)? {
			if self.count != 1 {
				return Err(VectorTileError::geometry("MoveTo command count is not 1"));
			}
			let start_point = self.next_point()?;
			let mut last_point = start_point;
			let mut sum: i128 = 0;

			if !self.next_command(LINE_TO)? {
				return Err(VectorTileError::geometry("expected LineTo command"));
			}
			if self.count == 0 {
				return Err(VectorTileError::geometry("LineTo command count is zero"));
			}
			if self.strict && self.count == 1 {
				return Err(VectorTileError::geometry(
					"LineTo command count is not greater than 1 (strict mode)",
				));
			}
			self.check_count()?;

			handler.ring_begin(self.count + 2);
			handler.ring_point(start_point);
			while self.count > 0 {
				let point = self.next_point()?;
				sum += i128::from(det(last_point, point));
				last_point = point;
				handler.ring_point(point);
			}

			if !self.next_command(CLOSE_PATH)? {
				return Err(VectorTileError::geometry("expected ClosePath command"));
			}

			sum += i128::from(det(last_point, start_point));
			handler.ring_point(start_point);
			handler.ring_end(sum > 0);
		}
		Ok(())
	}
}
