use super::super::{
	command::{CLOSE_PATH, LINE_TO, MOVE_TO, encode_zigzag32, pack_command},
	error::{Result, VectorTileError},
	geometry_type::GeomType,
	point::Point,
	value::PropertyValue,
};
use mvtview_core::Blob;

/// Collects the id, properties and geometry of one feature.
///
/// The geometry is encoded as soon as it is added. A feature holds one geometry type: points
/// are added once, linestrings and polygon rings may be added repeatedly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureBuilder {
	id: Option<u64>,
	properties: Vec<(String, Blob)>,
	geom_type: GeomType,
	geometry: Vec<u32>,
	cursor: Point,
}

impl FeatureBuilder {
	#[must_use]
	pub fn new() -> FeatureBuilder {
		FeatureBuilder::default()
	}

	pub fn set_id(&mut self, id: u64) {
		self.id = Some(id);
	}

	/// # Errors
	/// Returns [`VectorTileError::Format`] if the value cannot be encoded.
	pub fn add_property<'v>(&mut self, key: &str, value: impl Into<PropertyValue<'v>>) -> Result<()> {
		let value: PropertyValue<'v> = value.into();
		self.properties.push((key.to_string(), value.to_blob()?));
		Ok(())
	}

	/// Sets the geometry to a `Point` geometry with one MoveTo for all `points`.
	///
	/// # Errors
	/// Fails if `points` is empty or the feature already has a geometry.
	pub fn add_points(&mut self, points: &[Point]) -> Result<()> {
		if self.geom_type != GeomType::Unknown {
			return Err(VectorTileError::Precondition(format!(
				"feature already has a {} geometry",
				self.geom_type
			)));
		}
		if points.is_empty() {
			return Err(VectorTileError::geometry("a point geometry needs at least one point"));
		}

		self.encode(GeomType::Point, |feature| {
			feature.push_command(MOVE_TO, points.len())?;
			for point in points {
				feature.push_point(*point)?;
			}
			Ok(())
		})
	}

	/// Appends a linestring as MoveTo(1) + LineTo(n - 1).
	///
	/// # Errors
	/// Fails if the linestring has fewer than two points or the feature has a geometry of
	/// another type.
	pub fn add_linestring(&mut self, points: &[Point]) -> Result<()> {
		self.check_type(GeomType::LineString)?;
		let [first, rest @ ..] = points else {
			return Err(VectorTileError::geometry("a linestring needs at least two points"));
		};
		if rest.is_empty() {
			return Err(VectorTileError::geometry("a linestring needs at least two points"));
		}

		self.encode(GeomType::LineString, |feature| {
			feature.push_command(MOVE_TO, 1)?;
			feature.push_point(*first)?;
			feature.push_command(LINE_TO, rest.len())?;
			for point in rest {
				feature.push_point(*point)?;
			}
			Ok(())
		})
	}

	/// Appends a closed ring as MoveTo(1) + LineTo(n - 2) + ClosePath.
	///
	/// `points` must repeat the start point at the end. The repeated point is not encoded.
	///
	/// # Errors
	/// Fails if the ring has fewer than four points, is not closed, or the feature has a geometry
	/// of another type.
	pub fn add_ring(&mut self, points: &[Point]) -> Result<()> {
		self.check_type(GeomType::Polygon)?;
		if points.len() < 4 {
			return Err(VectorTileError::geometry("a ring needs at least four points"));
		}
		let [first, inner @ .., last] = points else {
			return Err(VectorTileError::geometry("a ring needs at least four points"));
		};
		if first != last {
			return Err(VectorTileError::geometry(format!(
				"ring is not closed, it starts at {first} and ends at {last}"
			)));
		}

		self.encode(GeomType::Polygon, |feature| {
			feature.push_command(MOVE_TO, 1)?;
			feature.push_point(*first)?;
			feature.push_command(LINE_TO, inner.len())?;
			for point in inner {
				feature.push_point(*point)?;
			}
			feature.push_command(CLOSE_PATH, 1)
		})
	}

	/// Runs `encode` and keeps its output only if it succeeds.
	fn encode<F>(&mut self, geom_type: GeomType, encode: F) -> Result<()>
	where
		F: FnOnce(&mut FeatureBuilder) -> Result<()>,
	{
		let (length, cursor) = (self.geometry.len(), self.cursor);
		match encode(self) {
			Ok(()) => {
				self.geom_type = geom_type;
				Ok(())
			}
			Err(error) => {
				self.geometry.truncate(length);
				self.cursor = cursor;
				Err(error)
			}
		}
	}

	fn check_type(&self, geom_type: GeomType) -> Result<()> {
		if self.geom_type == GeomType::Unknown || self.geom_type == geom_type {
			Ok(())
		} else {
			Err(VectorTileError::Precondition(format!(
				"cannot add {geom_type} geometry to a feature with a {} geometry",
				self.geom_type
			)))
		}
	}

	fn push_command(&mut self, id: u32, count: usize) -> Result<()> {
		let count = u32::try_from(count)
			.ok()
			.filter(|count| *count < (1 << 29))
			.ok_or_else(|| VectorTileError::geometry("too many points for one command"))?;
		self.geometry.push(pack_command(id, count));
		Ok(())
	}

	fn push_point(&mut self, point: Point) -> Result<()> {
		let dx = point.x.checked_sub(self.cursor.x);
		let dy = point.y.checked_sub(self.cursor.y);
		let (Some(dx), Some(dy)) = (dx, dy) else {
			return Err(VectorTileError::geometry(format!(
				"delta from {} to {point} overflows",
				self.cursor
			)));
		};
		self.geometry.push(encode_zigzag32(dx));
		self.geometry.push(encode_zigzag32(dy));
		self.cursor = point;
		Ok(())
	}

	#[must_use]
	pub fn id(&self) -> Option<u64> {
		self.id
	}

	/// Keys and encoded values in insertion order.
	#[must_use]
	pub fn properties(&self) -> &[(String, Blob)] {
		&self.properties
	}

	#[must_use]
	pub fn geom_type(&self) -> GeomType {
		self.geom_type
	}

	/// The encoded command stream.
	#[must_use]
	pub fn geometry(&self) -> &[u32] {
		&self.geometry
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn points() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.add_points(&[Point::new(25, 17), Point::new(24, 19)])?;
		assert_eq!(feature.geom_type(), GeomType::Point);
		assert_eq!(feature.geometry(), &[17, 50, 34, 1, 4]);
		assert!(matches!(
			feature.add_points(&[Point::new(0, 0)]),
			Err(VectorTileError::Precondition(_))
		));
		Ok(())
	}

	#[test]
	fn linestrings_continue_the_cursor() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.add_linestring(&[Point::new(2, 2), Point::new(2, 10), Point::new(10, 10)])?;
		feature.add_linestring(&[Point::new(1, 1), Point::new(3, 5)])?;
		assert_eq!(
			feature.geometry(),
			&[9, 4, 4, 18, 0, 16, 16, 0, 9, 17, 17, 10, 4, 8]
		);
		Ok(())
	}

	#[test]
	fn ring() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.add_ring(&[Point::new(3, 6), Point::new(8, 12), Point::new(20, 34), Point::new(3, 6)])?;
		assert_eq!(feature.geom_type(), GeomType::Polygon);
		assert_eq!(feature.geometry(), &[9, 6, 12, 18, 10, 12, 24, 44, 15]);
		Ok(())
	}

	#[test]
	fn invalid_geometries() {
		let mut feature = FeatureBuilder::new();
		assert!(feature.add_points(&[]).is_err());
		assert!(feature.add_linestring(&[Point::new(1, 1)]).is_err());
		assert!(feature.add_ring(&[Point::new(0, 0), Point::new(1, 0), Point::new(0, 0)]).is_err());
		assert!(
			feature
				.add_ring(&[Point::new(0, 0), Point::new(1, 0), Point::new(1, 1), Point::new(0, 1)])
				.is_err()
		);
		assert_eq!(feature.geom_type(), GeomType::Unknown);
		assert!(feature.geometry().is_empty());
	}

	#[test]
	fn mixed_types_are_rejected() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.add_linestring(&[Point::new(1, 1), Point::new(2, 2)])?;
		assert!(matches!(
			feature.add_ring(&[Point::new(0, 0), Point::new(1, 0), Point::new(1, 1), Point::new(0, 0)]),
			Err(VectorTileError::Precondition(_))
		));
		Ok(())
	}

	#[test]
	fn overflowing_delta_leaves_feature_unchanged() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.add_linestring(&[Point::new(1, 1), Point::new(2, 2)])?;
		let before = feature.clone();

		let result = feature.add_linestring(&[Point::new(i32::MIN, 0), Point::new(i32::MAX, 0)]);
		assert!(matches!(result, Err(VectorTileError::Geometry(_))));
		assert_eq!(feature, before);
		Ok(())
	}

	#[test]
	fn properties_are_encoded() -> Result<()> {
		let mut feature = FeatureBuilder::new();
		feature.set_id(3);
		feature.add_property("name", "x")?;
		assert_eq!(feature.id(), Some(3));
		assert_eq!(feature.properties()[0].0, "name");
		assert_eq!(feature.properties()[0].1.as_slice(), &[0x0A, 0x01, b'x']);
		Ok(())
	}
}
