//! Callback traits driven by the geometry decode functions.
//!
//! Each geometry type has its own trait, so a handler only implements what it is used for.
//! Decoding is generic over the handler type, there is no dynamic dispatch per point.

use super::point::Point;

/// Receives the points of a `Point` geometry.
pub trait PointHandler {
	/// Called once with the number of points that follow.
	fn points_begin(&mut self, _count: u32) {}
	fn points_point(&mut self, point: Point);
	fn points_end(&mut self) {}
}

/// Receives the linestrings of a `LineString` geometry.
pub trait LineStringHandler {
	/// Called at the start of every linestring with its number of points.
	fn linestring_begin(&mut self, _count: u32) {}
	fn linestring_point(&mut self, point: Point);
	fn linestring_end(&mut self) {}
}

/// Receives the rings of a `Polygon` geometry.
///
/// Every ring is reported closed: the start point is repeated at the end, so `ring_begin` is
/// called with the LineTo count plus two.
pub trait PolygonHandler {
	fn ring_begin(&mut self, _count: u32) {}
	fn ring_point(&mut self, point: Point);
	/// `is_exterior` is true when the ring's signed area is strictly positive.
	fn ring_end(&mut self, _is_exterior: bool) {}
}

/// A handler that can take any geometry type, required by [`super::decode_geometry`].
pub trait GeometryHandler: PointHandler + LineStringHandler + PolygonHandler {}

impl<T: PointHandler + LineStringHandler + PolygonHandler> GeometryHandler for T {}

/// A polygon ring as collected by [`GeometryCollector`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ring {
	pub points: Vec<Point>,
	pub is_exterior: bool,
}

/// Handler that stores everything it receives, one vector per geometry part.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeometryCollector {
	pub points: Vec<Point>,
	pub linestrings: Vec<Vec<Point>>,
	pub rings: Vec<Ring>,
}

impl GeometryCollector {
	#[must_use]
	pub fn new() -> GeometryCollector {
		GeometryCollector::default()
	}
}

impl PointHandler for GeometryCollector {
	fn points_begin(&mut self, count: u32) {
		self.points.reserve(count as usize);
	}

	fn points_point(&mut self, point: Point) {
		self.points.push(point);
	}
}

impl LineStringHandler for GeometryCollector {
	fn linestring_begin(&mut self, count: u32) {
		self.linestrings.push(Vec::with_capacity(count as usize));
	}

	fn linestring_point(&mut self, point: Point) {
		if let Some(line) = self.linestrings.last_mut() {
			line.push(point);
		}
	}
}

impl PolygonHandler for GeometryCollector {
	fn ring_begin(&mut self, count: u32) {
		self.rings.push(Ring {
			points: Vec::with_capacity(count as usize),
			is_exterior: false,
		});
	}

	fn ring_point(&mut self, point: Point) {
		if let Some(ring) = self.rings.last_mut() {
			ring.points.push(point);
		}
	}

	fn ring_end(&mut self, is_exterior: bool) {
		if let Some(ring) = self.rings.last_mut() {
			ring.is_exterior = is_exterior;
		}
	}
}
