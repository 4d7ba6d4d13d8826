use mvtview_geometry::{
	GeomType, GeometryCollector, Point, PropertyValue, Result, Ring, VectorTile, VectorTileError,
	builder::{FeatureBuilder, LayerBuilder, TileBuilder},
	decode_linestring_geometry, decode_point_geometry, decode_polygon_geometry,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn points(coords: &[(i32, i32)]) -> Vec<Point> {
	coords.iter().map(|&c| Point::from(c)).collect()
}

fn encode(feature: &FeatureBuilder) -> Result<Vec<u8>> {
	let mut layer = LayerBuilder::new("test");
	layer.add_feature(feature)?;
	let mut tile = TileBuilder::new();
	tile.add_layer(&layer)?;
	Ok(tile.to_blob()?.into_vec())
}

/// Decodes the only feature of the only layer.
fn decode(data: &[u8], strict: bool) -> Result<(GeomType, GeometryCollector)> {
	let _ = env_logger::builder().is_test(true).try_init();

	let tile = VectorTile::new(data);
	let layer = tile
		.get_layer_by_name("test")?
		.ok_or_else(|| VectorTileError::Precondition("layer is missing".to_string()))?;
	let feature = layer
		.next_feature()?
		.ok_or_else(|| VectorTileError::Precondition("feature is missing".to_string()))?;

	let mut collector = GeometryCollector::new();
	feature.decode_geometry(strict, &mut collector)?;
	Ok((feature.geom_type(), collector))
}

#[test]
fn point_round_trip() -> Result<()> {
	let input = points(&[(25, 17), (-3, 4096), (0, 0)]);
	let mut feature = FeatureBuilder::new();
	feature.add_points(&input)?;

	let (geom_type, collector) = decode(&encode(&feature)?, true)?;
	assert_eq!(geom_type, GeomType::Point);
	assert_eq!(collector.points, input);
	Ok(())
}

#[test]
fn linestring_round_trip() -> Result<()> {
	let first = points(&[(2, 2), (2, 10), (10, 10)]);
	let second = points(&[(-5, -5), (100, 200)]);
	let mut feature = FeatureBuilder::new();
	feature.add_linestring(&first)?;
	feature.add_linestring(&second)?;

	let (geom_type, collector) = decode(&encode(&feature)?, true)?;
	assert_eq!(geom_type, GeomType::LineString);
	assert_eq!(collector.linestrings, vec![first, second]);
	Ok(())
}

#[rstest]
#[case::plain(None, false)]
#[case::with_id(Some(17), false)]
#[case::with_properties(None, true)]
#[case::with_id_and_properties(Some(17), true)]
fn polygon_with_two_rings(#[case] id: Option<u64>, #[case] with_properties: bool) -> Result<()> {
	let degenerate = points(&[(10, 20), (20, 30), (30, 40), (10, 20)]);
	let square = points(&[(1, 1), (2, 1), (2, 2), (1, 2), (1, 1)]);

	let mut feature = FeatureBuilder::new();
	if let Some(id) = id {
		feature.set_id(id);
	}
	if with_properties {
		feature.add_property("foo", "bar")?;
		feature.add_property("height", 3.5f64)?;
	}
	feature.add_ring(&degenerate)?;
	feature.add_ring(&square)?;

	let (geom_type, collector) = decode(&encode(&feature)?, true)?;
	assert_eq!(geom_type, GeomType::Polygon);
	assert_eq!(
		collector.rings,
		vec![
			Ring {
				points: degenerate,
				is_exterior: false,
			},
			Ring {
				points: square,
				is_exterior: true,
			},
		]
	);
	Ok(())
}

#[test]
fn clockwise_ring_is_not_exterior() -> Result<()> {
	let ring = points(&[(1, 1), (1, 2), (2, 2), (2, 1), (1, 1)]);
	let mut feature = FeatureBuilder::new();
	feature.add_ring(&ring)?;

	let (_, collector) = decode(&encode(&feature)?, true)?;
	assert_eq!(collector.rings.len(), 1);
	assert!(!collector.rings[0].is_exterior);
	Ok(())
}

#[test]
fn properties_survive_the_round_trip() -> Result<()> {
	let mut feature = FeatureBuilder::new();
	feature.set_id(5);
	feature.add_property("name", "lake")?;
	feature.add_property("depth", -12i64)?;
	feature.add_property("visible", true)?;
	feature.add_points(&[Point::new(1, 1)])?;
	let data = encode(&feature)?;

	let tile = VectorTile::new(&data);
	let layer = tile
		.get_layer(0)?
		.ok_or_else(|| VectorTileError::Precondition("layer is missing".to_string()))?;
	let feature = layer
		.get_feature_by_id(5)?
		.ok_or_else(|| VectorTileError::Precondition("feature is missing".to_string()))?;

	let properties = feature.properties().collect::<Result<Vec<_>>>()?;
	assert_eq!(
		properties,
		vec![
			("name", &PropertyValue::String("lake")),
			("depth", &PropertyValue::SInt(-12)),
			("visible", &PropertyValue::Bool(true)),
		]
	);
	Ok(())
}

#[rstest]
#[case::strict(true)]
#[case::lenient(false)]
fn zero_length_segment(#[case] strict: bool) -> Result<()> {
	let line = points(&[(1, 1), (1, 1), (4, 5)]);
	let mut feature = FeatureBuilder::new();
	feature.add_linestring(&line)?;
	let data = encode(&feature)?;

	let result = decode(&data, strict);
	if strict {
		assert!(matches!(result, Err(VectorTileError::Geometry(_))));
	} else {
		assert_eq!(result?.1.linestrings, vec![line]);
	}
	Ok(())
}

#[rstest]
#[case::strict(true)]
#[case::lenient(false)]
fn ring_with_a_single_line_to(#[case] strict: bool) -> Result<()> {
	// MoveTo(1) (0,0) LineTo(1) (5,5) ClosePath
	let data: &[u32] = &[9, 0, 0, 10, 10, 10, 15];
	let mut collector = GeometryCollector::new();
	let mut decoder = mvtview_geometry::decoder::GeometryDecoder::from_stream(data.iter(), strict);
	let result = decoder.decode_polygon(&mut collector);
	assert_eq!(result.is_ok(), !strict);
	Ok(())
}

#[test]
fn decode_functions_check_the_type() -> Result<()> {
	let mut feature = FeatureBuilder::new();
	feature.add_points(&[Point::new(3, 3)])?;
	let data = encode(&feature)?;

	let tile = VectorTile::new(&data);
	let layer = tile
		.layers()
		.next()
		.ok_or_else(|| VectorTileError::Precondition("layer is missing".to_string()))??;
	let feature = layer
		.features()
		.next()
		.ok_or_else(|| VectorTileError::Precondition("feature is missing".to_string()))??;

	let mut collector = GeometryCollector::new();
	decode_point_geometry(feature.geometry(), true, &mut collector)?;
	assert!(matches!(
		decode_linestring_geometry(feature.geometry(), true, &mut collector),
		Err(VectorTileError::Precondition(_))
	));
	assert!(matches!(
		decode_polygon_geometry(feature.geometry(), true, &mut collector),
		Err(VectorTileError::Precondition(_))
	));
	assert_eq!(collector.points, vec![Point::new(3, 3)]);
	Ok(())
}

#[test]
fn views_borrow_the_buffer() -> Result<()> {
	let mut feature = FeatureBuilder::new();
	feature.add_property("name", "x")?;
	feature.add_points(&[Point::new(1, 2)])?;
	let data = encode(&feature)?;
	let range = data.as_ptr_range();

	let tile = VectorTile::new(&data);
	let layer = tile
		.get_layer(0)?
		.ok_or_else(|| VectorTileError::Precondition("layer is missing".to_string()))?;
	let feature = layer
		.next_feature()?
		.ok_or_else(|| VectorTileError::Precondition("feature is missing".to_string()))?;

	assert!(range.contains(&layer.name().as_ptr()));
	assert!(range.contains(&layer.key(0)?.as_ptr()));
	assert!(range.contains(&feature.geometry().data().as_ptr()));
	Ok(())
}
