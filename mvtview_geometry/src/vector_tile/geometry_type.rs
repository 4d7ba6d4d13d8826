use std::fmt::Display;

/// Geometry type declared by a feature (MVT field 3 of `Feature`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	Point = 1,
	LineString = 2,
	Polygon = 3,
}

impl GeomType {
	#[must_use]
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::Point,
			2 => GeomType::LineString,
			3 => GeomType::Polygon,
			_ => GeomType::Unknown,
		}
	}
}

impl Display for GeomType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			GeomType::Unknown => "unknown",
			GeomType::Point => "point",
			GeomType::LineString => "linestring",
			GeomType::Polygon => "polygon",
		})
	}
}
