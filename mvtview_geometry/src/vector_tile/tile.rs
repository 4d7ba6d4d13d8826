use super::{error::Result, layer::VectorTileLayer};
use anyhow::Context;
use byteorder::LE;
use log::trace;
use mvtview_core::io::{ValueReader, ValueReaderSlice};

/// A vector tile: a sequence of layers, borrowed from the tile buffer.
///
/// Only field 3 (`layers`) is read, other top-level fields are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorTile<'a> {
	data: &'a [u8],
	position: u64,
}

impl<'a> VectorTile<'a> {
	#[must_use]
	pub fn new(data: &'a [u8]) -> VectorTile<'a> {
		VectorTile { data, position: 0 }
	}

	#[must_use]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the next layer, or `None` after the last one.
	///
	/// A layer that fails to decode is still consumed, so the caller can skip it.
	///
	/// # Errors
	/// Returns the error of [`VectorTileLayer::new`], or [`super::VectorTileError::Format`] if the tile
	/// itself is malformed.
	pub fn next_layer(&mut self) -> Result<Option<VectorTileLayer<'a>>> {
		let mut reader = ValueReaderSlice::new_le(self.data);
		reader.set_position(self.position)?;

		let data = next_layer_data(&mut reader);
		self.position = reader.position();

		match data? {
			Some(data) => Ok(Some(VectorTileLayer::new(data)?)),
			None => Ok(None),
		}
	}

	/// Rewinds [`VectorTile::next_layer`] to the first layer.
	pub fn reset_layer(&mut self) {
		self.position = 0;
	}

	/// Counts the layers without decoding them.
	///
	/// # Errors
	/// Returns [`super::VectorTileError::Format`] if the tile is malformed.
	pub fn count_layers(&self) -> Result<usize> {
		let mut reader = ValueReaderSlice::new_le(self.data);
		let mut count = 0;
		while next_layer_data(&mut reader)?.is_some() {
			count += 1;
		}
		Ok(count)
	}

	/// Returns the layer at position `index`.
	///
	/// # Errors
	/// Returns an error if the tile or the selected layer is malformed.
	pub fn get_layer(&self, index: usize) -> Result<Option<VectorTileLayer<'a>>> {
		let mut reader = ValueReaderSlice::new_le(self.data);
		let mut current = 0;
		while let Some(data) = next_layer_data(&mut reader)? {
			if current == index {
				return Ok(Some(VectorTileLayer::new(data)?));
			}
			current += 1;
		}
		Ok(None)
	}

	/// Returns the first layer called `name`.
	///
	/// Layers are matched by name before they are fully validated, so a broken layer with
	/// another name does not hide the one asked for.
	///
	/// # Errors
	/// Returns an error if the tile or the matching layer is malformed.
	pub fn get_layer_by_name(&self, name: &str) -> Result<Option<VectorTileLayer<'a>>> {
		trace!("looking up layer '{name}'");
		let mut reader = ValueReaderSlice::new_le(self.data);
		while let Some(data) = next_layer_data(&mut reader)? {
			if read_layer_name(data)? == Some(name) {
				return Ok(Some(VectorTileLayer::new(data)?));
			}
		}
		Ok(None)
	}

	/// Iterates over all layers, independently of [`VectorTile::next_layer`].
	#[must_use]
	pub fn layers(&self) -> LayerIter<'a> {
		LayerIter {
			reader: ValueReaderSlice::new_le(self.data),
			failed: false,
		}
	}
}

fn next_layer_data<'a>(reader: &mut ValueReaderSlice<'a, LE>) -> Result<Option<&'a [u8]>> {
	while reader.has_remaining() {
		match reader.read_pbf_key().context("Failed to read PBF key")? {
			(3, 2) => return Ok(Some(reader.read_pbf_slice().context("Failed to read layer")?)),
			(_, w) => reader.skip_pbf_field(w).context("Failed to skip tile field")?,
		}
	}
	Ok(None)
}

fn read_layer_name(data: &[u8]) -> Result<Option<&str>> {
	let mut reader = ValueReaderSlice::new_le(data);
	let mut name = None;
	while reader.has_remaining() {
		match reader.read_pbf_key().context("Failed to read PBF key")? {
			(1, 2) => name = Some(reader.read_pbf_str().context("Failed to read layer name")?),
			(_, w) => reader.skip_pbf_field(w).context("Failed to skip layer field")?,
		}
	}
	Ok(name)
}

/// Iterator over the layers of a tile, see [`VectorTile::layers`].
pub struct LayerIter<'a> {
	reader: ValueReaderSlice<'a, LE>,
	failed: bool,
}

impl<'a> Iterator for LayerIter<'a> {
	type Item = Result<VectorTileLayer<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		match next_layer_data(&mut self.reader) {
			Ok(Some(data)) => Some(VectorTileLayer::new(data)),
			Ok(None) => None,
			Err(error) => {
				self.failed = true;
				Some(Err(error))
			}
		}
	}
}
