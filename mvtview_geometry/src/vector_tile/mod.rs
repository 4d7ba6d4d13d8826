//! Mapbox Vector Tile (MVT) decoding.
//!
//! The decoder works on borrowed views and never copies the tile buffer:
//!
//! - [`tile`]: the top-level container, iterating over layers.
//! - [`layer`]: one layer with lazily built key/value tables and a feature cursor.
//! - [`feature`]: id, geometry type, raw geometry and tags of one feature.
//! - [`geometry`] and [`decoder`]: the command stream decoder, driving a handler from [`handler`].
//! - [`value`]: typed MVT property values.
//! - [`builder`]: an encoder producing tiles the decoder can read back.
//!
//! All fallible operations return [`Result`] with a [`VectorTileError`].

pub mod builder;
pub mod command;
pub mod decoder;
mod error;
mod feature;
pub mod geometry;
mod geometry_type;
pub mod handler;
mod layer;
mod point;
mod tile;
mod value;

pub use error::{Result, TableKind, VectorTileError};
pub use feature::{TagIter, VectorTileFeature};
pub use geometry::{Geometry, decode_geometry, decode_linestring_geometry, decode_point_geometry, decode_polygon_geometry};
pub use geometry_type::GeomType;
pub use handler::{GeometryCollector, GeometryHandler, LineStringHandler, PointHandler, PolygonHandler, Ring};
pub use layer::{DEFAULT_EXTENT, DEFAULT_VERSION, FeatureIter, VectorTileLayer};
pub use point::Point;
pub use tile::{LayerIter, VectorTile};
pub use value::PropertyValue;
