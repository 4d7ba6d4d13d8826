//! Encoder for vector tiles, the counterpart of the decoder views.
//!
//! ```rust
//! use mvtview_geometry::{Point, VectorTile, builder::{FeatureBuilder, LayerBuilder, TileBuilder}};
//!
//! fn main() -> mvtview_geometry::Result<()> {
//!     let mut feature = FeatureBuilder::new();
//!     feature.set_id(1);
//!     feature.add_property("name", "fountain")?;
//!     feature.add_points(&[Point::new(10, 20)])?;
//!
//!     let mut layer = LayerBuilder::new("pois");
//!     layer.add_feature(&feature)?;
//!
//!     let mut tile = TileBuilder::new();
//!     tile.add_layer(&layer)?;
//!     let blob = tile.to_blob()?;
//!
//!     let tile = VectorTile::new(blob.as_slice());
//!     assert_eq!(tile.count_layers()?, 1);
//!     Ok(())
//! }
//! ```

mod feature_builder;
mod indexed_set;
mod layer_builder;
mod tile_builder;

pub use feature_builder::FeatureBuilder;
pub use layer_builder::LayerBuilder;
pub use tile_builder::TileBuilder;
