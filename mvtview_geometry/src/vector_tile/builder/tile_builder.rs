use super::{super::error::Result, layer_builder::LayerBuilder};
use anyhow::Context;
use mvtview_core::{
	Blob,
	io::{ValueWriter, ValueWriterBlob},
};

/// Builds a tile from encoded layers, keeping the order in which they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileBuilder {
	layers: Vec<Blob>,
}

impl TileBuilder {
	#[must_use]
	pub fn new() -> TileBuilder {
		TileBuilder::default()
	}

	/// # Errors
	/// Returns an error if the layer cannot be encoded.
	pub fn add_layer(&mut self, layer: &LayerBuilder) -> Result<()> {
		self.layers.push(layer.to_blob()?);
		Ok(())
	}

	/// # Errors
	/// Returns an error if writing fails.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		for layer in &self.layers {
			writer.write_pbf_key(3, 2).context("Failed to write PBF key")?;
			writer.write_pbf_blob(layer).context("Failed to write PBF blob")?;
		}

		Ok(writer.into_blob())
	}
}
