//! Vector Tile **Layer** view.
//!
//! This module defines [`VectorTileLayer`], a read-only view over one length-delimited layer
//! message inside a tile buffer. Nothing is copied: names, keys and feature payloads are slices
//! of the caller's buffer.
//!
//! The encoding follows the MVT schema:
//!  * field 1: `name` (string, required)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint, default 4096)
//!  * field 15: `version` (varint, default 1)
//!
//! Any other field is rejected. The key and value tables are built lazily on first use, with a
//! single pass over the layer, and cached for the lifetime of the view. The cache lives in a
//! [`OnceCell`], so a layer is `!Sync`: share the tile buffer between threads, not the layer.

use super::{
	error::{Result, TableKind, VectorTileError},
	feature::VectorTileFeature,
	value::PropertyValue,
};
use anyhow::Context;
use byteorder::LE;
use log::{debug, trace};
use mvtview_core::io::{ValueReader, ValueReaderSlice};
use std::cell::{Cell, OnceCell};

pub const DEFAULT_EXTENT: u32 = 4096;
pub const DEFAULT_VERSION: u32 = 1;

#[derive(Debug, Default)]
struct LayerTables<'a> {
	keys: Vec<&'a str>,
	values: Vec<PropertyValue<'a>>,
}

/// A single layer of a vector tile, borrowed from the tile buffer.
#[derive(Debug)]
pub struct VectorTileLayer<'a> {
	data: &'a [u8],
	name: &'a str,
	version: u32,
	extent: u32,
	num_features: usize,
	num_keys: usize,
	num_values: usize,
	feature_position: Cell<u64>,
	tables: OnceCell<LayerTables<'a>>,
	#[cfg(test)]
	table_scans: Cell<usize>,
}

impl<'a> VectorTileLayer<'a> {
	/// Scans a layer message once, collecting its scalar fields and counting features, keys and values.
	///
	/// # Errors
	/// * [`VectorTileError::Format`] for malformed protobuf, unknown fields, or a missing or empty name.
	/// * [`VectorTileError::Version`] if the version is not 1 or 2.
	pub fn new(data: &'a [u8]) -> Result<VectorTileLayer<'a>> {
		let mut reader = ValueReaderSlice::new_le(data);

		let mut name = None;
		let mut version = DEFAULT_VERSION;
		let mut extent = DEFAULT_EXTENT;
		let mut num_features = 0;
		let mut num_keys = 0;
		let mut num_values = 0;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_str().context("Failed to read layer name")?),
				(2, 2) => {
					reader.read_pbf_slice().context("Failed to skip feature")?;
					num_features += 1;
				}
				(3, 2) => {
					reader.read_pbf_slice().context("Failed to skip property key")?;
					num_keys += 1;
				}
				(4, 2) => {
					reader.read_pbf_slice().context("Failed to skip property value")?;
					num_values += 1;
				}
				(5, 0) => {
					extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)
						.context("Layer extent does not fit into 32 bits")?;
				}
				(15, 0) => {
					version = u32::try_from(reader.read_varint().context("Failed to read version")?)
						.context("Layer version does not fit into 32 bits")?;
				}
				(f, w) => {
					return Err(VectorTileError::format(format!(
						"unexpected combination of field number ({f}) and wire type ({w}) in layer"
					)));
				}
			}
		}

		if !(1..=2).contains(&version) {
			return Err(VectorTileError::Version(version));
		}

		let name = match name {
			Some(name) if !name.is_empty() => name,
			Some(_) => return Err(VectorTileError::format("layer name is empty")),
			None => return Err(VectorTileError::format("layer name is required")),
		};

		debug!("layer '{name}': version {version}, extent {extent}, {num_features} features, {num_keys} keys, {num_values} values");

		Ok(VectorTileLayer {
			data,
			name,
			version,
			extent,
			num_features,
			num_keys,
			num_values,
			feature_position: Cell::new(0),
			tables: OnceCell::new(),
			#[cfg(test)]
			table_scans: Cell::new(0),
		})
	}

	#[must_use]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	#[must_use]
	pub fn name(&self) -> &'a str {
		self.name
	}

	#[must_use]
	pub fn version(&self) -> u32 {
		self.version
	}

	#[must_use]
	pub fn extent(&self) -> u32 {
		self.extent
	}

	/// Number of features in this layer.
	#[must_use]
	pub fn size(&self) -> usize {
		self.num_features
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.num_features == 0
	}

	fn tables(&self) -> Result<&LayerTables<'a>> {
		if let Some(tables) = self.tables.get() {
			return Ok(tables);
		}
		let tables = self.build_tables()?;
		Ok(self.tables.get_or_init(|| tables))
	}

	fn build_tables(&self) -> Result<LayerTables<'a>> {
		if self.num_keys == 0 && self.num_values == 0 {
			return Ok(LayerTables::default());
		}

		#[cfg(test)]
		self.table_scans.set(self.table_scans.get() + 1);

		let mut tables = LayerTables {
			keys: Vec::with_capacity(self.num_keys),
			values: Vec::with_capacity(self.num_values),
		};

		let mut reader = ValueReaderSlice::new_le(self.data);
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => tables
					.keys
					.push(reader.read_pbf_str().context("Failed to read property key")?),
				(4, 2) => {
					let value = reader.read_pbf_slice().context("Failed to read property value")?;
					tables.values.push(PropertyValue::read(value)?);
				}
				(_, w) => reader.skip_pbf_field(w).context("Failed to skip layer field")?,
			}
		}

		debug!(
			"layer '{}': built tables with {} keys and {} values",
			self.name,
			tables.keys.len(),
			tables.values.len()
		);

		Ok(tables)
	}

	/// Builds the key and value tables if that has not happened yet.
	///
	/// # Errors
	/// Returns [`VectorTileError::Format`] if a key or value cannot be decoded. A failed build is
	/// not cached, so the next access scans again and fails the same way.
	pub fn initialize_tables(&self) -> Result<()> {
		self.tables().map(|_| ())
	}

	/// All keys of this layer. Tag key indexes point into this table.
	///
	/// # Errors
	/// See [`VectorTileLayer::initialize_tables`].
	pub fn key_table(&self) -> Result<&[&'a str]> {
		Ok(&self.tables()?.keys)
	}

	/// All values of this layer. Tag value indexes point into this table.
	///
	/// # Errors
	/// See [`VectorTileLayer::initialize_tables`].
	pub fn value_table(&self) -> Result<&[PropertyValue<'a>]> {
		Ok(&self.tables()?.values)
	}

	/// # Errors
	/// Returns [`VectorTileError::Index`] if `index` is outside the key table.
	pub fn key(&self, index: u32) -> Result<&'a str> {
		let keys = &self.tables()?.keys;
		keys.get(index as usize).copied().ok_or(VectorTileError::Index {
			table: TableKind::Key,
			index,
			size: keys.len(),
		})
	}

	/// # Errors
	/// Returns [`VectorTileError::Index`] if `index` is outside the value table.
	pub fn value(&self, index: u32) -> Result<&PropertyValue<'a>> {
		let values = &self.tables()?.values;
		values.get(index as usize).ok_or(VectorTileError::Index {
			table: TableKind::Value,
			index,
			size: values.len(),
		})
	}

	/// Returns the feature after the one returned by the previous call, or `None` once all
	/// features have been visited.
	///
	/// The position is kept inside the layer. If a feature fails to decode, the position still
	/// moves past it, so the caller can skip it and continue.
	///
	/// # Errors
	/// Returns [`VectorTileError::Format`] if the next feature is malformed.
	pub fn next_feature(&self) -> Result<Option<VectorTileFeature<'_, 'a>>> {
		let mut reader = ValueReaderSlice::new_le(self.data);
		reader.set_position(self.feature_position.get())?;

		let data = next_feature_data(&mut reader);
		self.feature_position.set(reader.position());

		match data? {
			Some(data) => Ok(Some(VectorTileFeature::new(self, data)?)),
			None => Ok(None),
		}
	}

	/// Rewinds [`VectorTileLayer::next_feature`] to the first feature.
	pub fn reset_feature(&self) {
		self.feature_position.set(0);
	}

	/// Iterates over all features, independently of [`VectorTileLayer::next_feature`].
	#[must_use]
	pub fn features(&self) -> FeatureIter<'_, 'a> {
		FeatureIter {
			layer: self,
			reader: ValueReaderSlice::new_le(self.data),
			failed: false,
		}
	}

	/// Finds a feature by id with a linear scan that only decodes feature ids.
	///
	/// Feature ids are not required to be unique. If several features share `id`, any one of
	/// them may be returned.
	///
	/// # Errors
	/// Returns [`VectorTileError::Format`] if a feature is malformed.
	pub fn get_feature_by_id(&self, id: u64) -> Result<Option<VectorTileFeature<'_, 'a>>> {
		trace!("layer '{}': looking up feature {id}", self.name);

		let mut reader = ValueReaderSlice::new_le(self.data);
		while let Some(data) = next_feature_data(&mut reader)? {
			if read_feature_id(data)? == Some(id) {
				return Ok(Some(VectorTileFeature::new(self, data)?));
			}
		}
		Ok(None)
	}

	#[cfg(test)]
	pub(crate) fn table_scans(&self) -> usize {
		self.table_scans.get()
	}
}

fn next_feature_data<'a>(reader: &mut ValueReaderSlice<'a, LE>) -> Result<Option<&'a [u8]>> {
	while reader.has_remaining() {
		match reader.read_pbf_key().context("Failed to read PBF key")? {
			(2, 2) => return Ok(Some(reader.read_pbf_slice().context("Failed to read feature")?)),
			(_, w) => reader.skip_pbf_field(w).context("Failed to skip layer field")?,
		}
	}
	Ok(None)
}

fn read_feature_id(data: &[u8]) -> Result<Option<u64>> {
	let mut reader = ValueReaderSlice::new_le(data);
	let mut id = None;
	while reader.has_remaining() {
		match reader.read_pbf_key().context("Failed to read PBF key")? {
			(1, 0) => id = Some(reader.read_varint().context("Failed to read feature id")?),
			(_, w) => reader.skip_pbf_field(w).context("Failed to skip feature field")?,
		}
	}
	Ok(id)
}

/// Iterator over the features of a layer, see [`VectorTileLayer::features`].
pub struct FeatureIter<'l, 'a> {
	layer: &'l VectorTileLayer<'a>,
	reader: ValueReaderSlice<'a, LE>,
	failed: bool,
}

impl<'l, 'a> Iterator for FeatureIter<'l, 'a> {
	type Item = Result<VectorTileFeature<'l, 'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		match next_feature_data(&mut self.reader) {
			Ok(Some(data)) => Some(VectorTileFeature::new(self.layer, data)),
			Ok(None) => None,
			Err(error) => {
				self.failed = true;
				Some(Err(error))
			}
		}
	}
}
