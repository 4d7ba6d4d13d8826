//! Zero-copy decoding of Mapbox Vector Tiles.
//!
//! A tile buffer is read through [`VectorTile`], which yields one [`VectorTileLayer`] view per
//! layer. Layers hand out [`VectorTileFeature`] views, and a feature's [`Geometry`] is turned into
//! points, linestrings or polygon rings by the decode functions calling back into a handler.
//! [`builder`] contains the matching encoder.

pub mod vector_tile;

pub use vector_tile::*;
