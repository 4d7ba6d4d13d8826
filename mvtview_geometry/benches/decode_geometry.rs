use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mvtview_geometry::{
	GeometryCollector, Point, PolygonHandler, VectorTile,
	builder::{FeatureBuilder, LayerBuilder, TileBuilder},
	decode_polygon_geometry,
};
use std::hint::black_box;

// A polygon with `rings` square rings of `size` points each
fn build_polygon_tile(rings: i32, size: i32) -> Vec<u8> {
	let mut feature = FeatureBuilder::new();
	for r in 0..rings {
		let offset = r * 10;
		let mut ring: Vec<Point> = (0..size).map(|i| Point::new(offset + i, offset)).collect();
		ring.extend((0..size).map(|i| Point::new(offset + size, offset + i)));
		ring.push(Point::new(offset, offset + size));
		ring.push(Point::new(offset, offset));
		feature.add_ring(&ring).unwrap();
	}

	let mut layer = LayerBuilder::new("bench");
	layer.add_feature(&feature).unwrap();
	let mut tile = TileBuilder::new();
	tile.add_layer(&layer).unwrap();
	tile.to_blob().unwrap().into_vec()
}

struct AreaOnly {
	exterior: usize,
}

impl PolygonHandler for AreaOnly {
	fn ring_point(&mut self, point: Point) {
		black_box(point);
	}

	fn ring_end(&mut self, is_exterior: bool) {
		if is_exterior {
			self.exterior += 1;
		}
	}
}

fn bench_decode_polygon(c: &mut Criterion) {
	let data = build_polygon_tile(50, 200);
	let tile = VectorTile::new(&data);
	let layer = tile.get_layer(0).unwrap().unwrap();
	let feature = layer.next_feature().unwrap().unwrap();
	let geometry = feature.geometry();

	let mut group = c.benchmark_group("decode_polygon");
	group.throughput(Throughput::Bytes(geometry.data().len() as u64));

	group.bench_function("collector", |b| {
		b.iter(|| {
			let mut collector = GeometryCollector::new();
			decode_polygon_geometry(black_box(geometry), true, &mut collector).unwrap();
			collector
		})
	});

	group.bench_function("callbacks_only", |b| {
		b.iter(|| {
			let mut handler = AreaOnly { exterior: 0 };
			decode_polygon_geometry(black_box(geometry), false, &mut handler).unwrap();
			handler.exterior
		})
	});

	group.finish();
}

fn bench_layer_tables(c: &mut Criterion) {
	let mut layer = LayerBuilder::new("bench");
	for i in 0..1000u64 {
		let mut feature = FeatureBuilder::new();
		feature.set_id(i);
		feature.add_property("id", i).unwrap();
		feature.add_property("kind", if i % 2 == 0 { "even" } else { "odd" }).unwrap();
		feature.add_points(&[Point::new(1, 1)]).unwrap();
		layer.add_feature(&feature).unwrap();
	}
	let data = layer.to_blob().unwrap().into_vec();

	c.bench_function("layer_tables", |b| {
		b.iter(|| {
			let layer = mvtview_geometry::VectorTileLayer::new(black_box(&data)).unwrap();
			layer.value_table().unwrap().len()
		})
	});
}

criterion_group!(benches, bench_decode_polygon, bench_layer_tables);
criterion_main!(benches);
