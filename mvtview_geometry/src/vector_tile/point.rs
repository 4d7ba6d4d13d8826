use std::fmt::Display;

/// A point in tile coordinates, interpreted against the layer's extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
	pub x: i32,
	pub y: i32,
}

impl Point {
	#[must_use]
	pub const fn new(x: i32, y: i32) -> Point {
		Point { x, y }
	}
}

impl From<(i32, i32)> for Point {
	fn from((x, y): (i32, i32)) -> Self {
		Point { x, y }
	}
}

impl From<[i32; 2]> for Point {
	fn from([x, y]: [i32; 2]) -> Self {
		Point { x, y }
	}
}

impl Display for Point {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({},{})", self.x, self.y)
	}
}
