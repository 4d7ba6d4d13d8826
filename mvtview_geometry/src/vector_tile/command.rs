//! Command integers and parameter integers of the geometry encoding.
//!
//! A command integer packs the command id into its low 3 bits and the repeat count into the
//! remaining 29 bits. Parameters are zigzag-encoded deltas relative to the previous point.

use super::point::Point;

pub const MOVE_TO: u32 = 1;
pub const LINE_TO: u32 = 2;
pub const CLOSE_PATH: u32 = 7;

/// Packs a command id and a repeat count into a command integer.
#[must_use]
pub const fn pack_command(id: u32, count: u32) -> u32 {
	(id & 0x7) | (count << 3)
}

/// Splits a command integer into `(id, count)`.
#[must_use]
pub const fn unpack_command(command: u32) -> (u32, u32) {
	(command & 0x7, command >> 3)
}

#[must_use]
pub const fn command_name(id: u32) -> &'static str {
	match id {
		MOVE_TO => "MoveTo",
		LINE_TO => "LineTo",
		CLOSE_PATH => "ClosePath",
		_ => "unknown",
	}
}

#[must_use]
pub const fn decode_zigzag32(value: u32) -> i32 {
	((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[must_use]
pub const fn encode_zigzag32(value: i32) -> u32 {
	((value << 1) ^ (value >> 31)) as u32
}

/// Cross product of two points, one term of the shoelace sum.
#[must_use]
pub const fn det(a: Point, b: Point) -> i64 {
	(a.x as i64) * (b.y as i64) - (b.x as i64) * (a.y as i64)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(MOVE_TO, 1, 9)]
	#[case(LINE_TO, 3, 26)]
	#[case(CLOSE_PATH, 1, 15)]
	#[case(MOVE_TO, 0, 1)]
	#[case(LINE_TO, (1 << 29) - 1, 0xFFFF_FFFA)]
	fn pack_and_unpack(#[case] id: u32, #[case] count: u32, #[case] packed: u32) {
		assert_eq!(pack_command(id, count), packed);
		assert_eq!(unpack_command(packed), (id, count));
	}

	#[test]
	fn unpack_keeps_unknown_ids() {
		assert_eq!(unpack_command(pack_command(4, 2)), (4, 2));
		assert_eq!(command_name(4), "unknown");
	}

	#[rstest]
	#[case(0, 0)]
	#[case(1, -1)]
	#[case(2, 1)]
	#[case(3, -2)]
	#[case(50, 25)]
	#[case(0xFFFF_FFFE, i32::MAX)]
	#[case(0xFFFF_FFFF, i32::MIN)]
	fn zigzag(#[case] encoded: u32, #[case] decoded: i32) {
		assert_eq!(decode_zigzag32(encoded), decoded);
		assert_eq!(encode_zigzag32(decoded), encoded);
	}

	#[test]
	fn det_does_not_overflow() {
		let a = Point::new(i32::MAX, i32::MIN);
		let b = Point::new(i32::MIN, i32::MAX);
		assert_eq!(det(a, b), i64::from(i32::MAX) * i64::from(i32::MAX) - i64::from(i32::MIN) * i64::from(i32::MIN));
		assert_eq!(det(Point::new(10, 20), Point::new(20, 30)), 10 * 30 - 20 * 20);
	}
}
