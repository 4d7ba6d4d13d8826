use super::{
	decoder::GeometryDecoder,
	error::{Result, VectorTileError},
	geometry_type::GeomType,
	handler::{GeometryHandler, LineStringHandler, PointHandler, PolygonHandler},
};
use byteorder::LE;
use log::trace;
use mvtview_core::io::ValueReaderSlice;

/// The undecoded geometry of a feature: its declared type and a view of the command stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry<'a> {
	data: &'a [u8],
	geom_type: GeomType,
}

impl<'a> Geometry<'a> {
	#[must_use]
	pub fn new(data: &'a [u8], geom_type: GeomType) -> Geometry<'a> {
		Geometry { data, geom_type }
	}

	/// Packed varint command stream, borrowed from the tile buffer.
	#[must_use]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	#[must_use]
	pub fn geom_type(&self) -> GeomType {
		self.geom_type
	}

	fn decoder(&self, expected: GeomType, strict: bool) -> Result<GeometryDecoder<ValueReaderSlice<'a, LE>>> {
		if self.geom_type != expected {
			return Err(VectorTileError::Precondition(format!(
				"cannot decode a {} geometry as {}",
				self.geom_type, expected
			)));
		}
		Ok(GeometryDecoder::new(self.data, strict))
	}
}

/// Decodes a `Point` geometry: one MoveTo with at least one point and nothing after it.
///
/// # Errors
/// Returns [`VectorTileError::Precondition`] if the geometry is not a point geometry, and
/// [`VectorTileError::Geometry`] if the command stream is invalid.
pub fn decode_point_geometry<H: PointHandler + ?Sized>(geometry: Geometry<'_>, strict: bool, handler: &mut H) -> Result<()> {
	geometry
		.decoder(GeomType::Point, strict)?
		.decode_points(handler)
}

/// Decodes a `LineString` geometry: zero or more MoveTo(1) + LineTo(n) sequences.
///
/// # Errors
/// Returns [`VectorTileError::Precondition`] if the geometry is not a linestring geometry, and
/// [`VectorTileError::Geometry`] if the command stream is invalid.
pub fn decode_linestring_geometry<H: LineStringHandler + ?Sized>(
	geometry: Geometry<'_>,
	strict: bool,
	handler: &mut H,
) -> Result<()> {
	geometry
		.decoder(GeomType::LineString, strict)?
		.decode_linestrings(handler)
}

/// Decodes a `Polygon` geometry: zero or more MoveTo(1) + LineTo(n) + ClosePath rings.
///
/// # Errors
/// Returns [`VectorTileError::Precondition`] if the geometry is not a polygon geometry, and
/// [`VectorTileError::Geometry`] if the command stream is invalid.
pub fn decode_polygon_geometry<H: PolygonHandler + ?Sized>(
	geometry: Geometry<'_>,
	strict: bool,
	handler: &mut H,
) -> Result<()> {
	geometry
		.decoder(GeomType::Polygon, strict)?
		.decode_polygon(handler)
}

/// Decodes a geometry of any type, choosing the decoder from the declared type.
///
/// # Errors
/// Returns [`VectorTileError::Geometry`] for geometries of unknown type or invalid command streams.
pub fn decode_geometry<H: GeometryHandler + ?Sized>(geometry: Geometry<'_>, strict: bool, handler: &mut H) -> Result<()> {
	trace!("decoding {} geometry of {} bytes", geometry.geom_type, geometry.data.len());
	match geometry.geom_type {
		GeomType::Point => decode_point_geometry(geometry, strict, handler),
		GeomType::LineString => decode_linestring_geometry(geometry, strict, handler),
		GeomType::Polygon => decode_polygon_geometry(geometry, strict, handler),
		GeomType::Unknown => Err(VectorTileError::geometry("unknown geometry type")),
	}
}

#[cfg(test)]
mod tests {
	use super::super::{handler::GeometryCollector, point::Point};
	use super::*;

	// MoveTo(1) (25,17)
	const POINT: &[u8] = &[9, 50, 34];
	// MoveTo(1) (2,2) LineTo(2) (2,10) (10,10)
	const LINESTRING: &[u8] = &[9, 4, 4, 18, 0, 16, 16, 0];
	// MoveTo(1) (3,6) LineTo(2) (8,12) (20,34) ClosePath
	const POLYGON: &[u8] = &[9, 6, 12, 18, 10, 12, 24, 44, 15];

	#[test]
	fn accessors() {
		let geometry = Geometry::new(POINT, GeomType::Point);
		assert_eq!(geometry.data(), POINT);
		assert_eq!(geometry.geom_type(), GeomType::Point);
	}

	#[test]
	fn decode_point_from_bytes() -> Result<()> {
		let mut collector = GeometryCollector::new();
		decode_point_geometry(Geometry::new(POINT, GeomType::Point), true, &mut collector)?;
		assert_eq!(collector.points, vec![Point::new(25, 17)]);
		Ok(())
	}

	#[test]
	fn decode_point_with_trailing_integer() {
		let mut collector = GeometryCollector::new();
		let result = decode_point_geometry(Geometry::new(&[9, 50, 34, 9], GeomType::Point), true, &mut collector);
		assert!(matches!(result, Err(VectorTileError::Geometry(_))));
	}

	#[test]
	fn decode_with_wrong_type_is_a_precondition_error() {
		let mut collector = GeometryCollector::new();
		let result = decode_polygon_geometry(Geometry::new(POINT, GeomType::Point), true, &mut collector);
		match result {
			Err(VectorTileError::Precondition(message)) => {
				assert_eq!(message, "cannot decode a point geometry as polygon");
			}
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[test]
	fn decode_dispatches_by_type() -> Result<()> {
		let mut collector = GeometryCollector::new();
		decode_geometry(Geometry::new(POINT, GeomType::Point), true, &mut collector)?;
		decode_geometry(Geometry::new(LINESTRING, GeomType::LineString), true, &mut collector)?;
		decode_geometry(Geometry::new(POLYGON, GeomType::Polygon), true, &mut collector)?;
		assert_eq!(collector.points.len(), 1);
		assert_eq!(
			collector.linestrings,
			vec![vec![Point::new(2, 2), Point::new(2, 10), Point::new(10, 10)]]
		);
		assert_eq!(collector.rings.len(), 1);
		assert_eq!(collector.rings[0].points.len(), 4);
		assert!(collector.rings[0].is_exterior);
		Ok(())
	}

	#[test]
	fn decode_unknown_type_fails() {
		let mut collector = GeometryCollector::new();
		let result = decode_geometry(Geometry::new(POINT, GeomType::Unknown), true, &mut collector);
		assert!(matches!(result, Err(VectorTileError::Geometry(_))));
	}

	#[test]
	fn malformed_varint_is_a_format_error() {
		let mut collector = GeometryCollector::new();
		let result = decode_point_geometry(Geometry::new(&[9, 2, 0x80], GeomType::Point), true, &mut collector);
		assert!(matches!(result, Err(VectorTileError::Format(_))));
	}

	#[test]
	fn huge_point_count_is_a_geometry_error() {
		// MoveTo with count 2^29-1 as a five byte varint, then a single pair
		let mut collector = GeometryCollector::new();
		let result = decode_point_geometry(
			Geometry::new(&[0xF9, 0xFF, 0xFF, 0xFF, 0x0F, 2, 2], GeomType::Point),
			true,
			&mut collector,
		);
		assert!(matches!(result, Err(VectorTileError::Geometry(_))));
		assert!(collector.points.is_empty());
	}

	#[test]
	fn decoding_leaves_buffer_untouched() -> Result<()> {
		let buffer = POLYGON.to_vec();
		let mut collector = GeometryCollector::new();
		decode_polygon_geometry(Geometry::new(&buffer, GeomType::Polygon), true, &mut collector)?;
		assert_eq!(buffer, POLYGON);
		Ok(())
	}

	struct CountingHandler {
		begin: Option<u32>,
		points: u32,
		ended: bool,
	}

	impl PointHandler for CountingHandler {
		fn points_begin(&mut self, count: u32) {
			self.begin = Some(count);
		}

		fn points_point(&mut self, _point: Point) {
			self.points += 1;
		}

		fn points_end(&mut self) {
			self.ended = true;
		}
	}

	#[test]
	fn handler_only_needs_the_methods_it_uses() -> Result<()> {
		let mut handler = CountingHandler {
			begin: None,
			points: 0,
			ended: false,
		};
		decode_point_geometry(Geometry::new(&[17, 2, 2, 2, 2], GeomType::Point), true, &mut handler)?;
		assert_eq!(handler.begin, Some(2));
		assert_eq!(handler.points, 2);
		assert!(handler.ended);
		Ok(())
	}
}
