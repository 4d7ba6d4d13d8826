use super::{
	super::error::{Result, VectorTileError},
	feature_builder::FeatureBuilder,
	indexed_set::IndexedSet,
};
use anyhow::Context;
use log::trace;
use mvtview_core::{
	Blob,
	io::{ValueWriter, ValueWriterBlob},
};

/// Builds one layer message. Keys and values are deduplicated across features.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerBuilder {
	name: String,
	version: u32,
	extent: u32,
	keys: IndexedSet<String>,
	values: IndexedSet<Blob>,
	features: Vec<Blob>,
}

impl LayerBuilder {
	/// Creates a version 2 layer with an extent of 4096.
	#[must_use]
	pub fn new(name: &str) -> LayerBuilder {
		LayerBuilder {
			name: name.to_string(),
			version: 2,
			extent: 4096,
			keys: IndexedSet::new(),
			values: IndexedSet::new(),
			features: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_version(mut self, version: u32) -> LayerBuilder {
		self.version = version;
		self
	}

	#[must_use]
	pub fn with_extent(mut self, extent: u32) -> LayerBuilder {
		self.extent = extent;
		self
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.features.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}

	/// Encodes `feature` and appends it to the layer.
	///
	/// # Errors
	/// Returns [`VectorTileError::Precondition`] if the feature has no geometry.
	pub fn add_feature(&mut self, feature: &FeatureBuilder) -> Result<()> {
		if feature.geometry().is_empty() {
			return Err(VectorTileError::Precondition(
				"cannot add a feature without geometry".to_string(),
			));
		}

		let mut tag_ids = Vec::with_capacity(feature.properties().len() * 2);
		for (key, value) in feature.properties() {
			tag_ids.push(self.keys.add(key.clone()));
			tag_ids.push(self.values.add(value.clone()));
		}

		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = feature.id() {
			writer
				.write_pbf_key(1, 0)
				.context("Failed to write PBF key for feature ID")?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !tag_ids.is_empty() {
			writer
				.write_pbf_key(2, 2)
				.context("Failed to write PBF key for tag IDs")?;
			writer
				.write_pbf_packed_uint32(&tag_ids)
				.context("Failed to write tag IDs")?;
		}

		writer
			.write_pbf_key(3, 0)
			.context("Failed to write PBF key for geometry type")?;
		writer
			.write_varint(feature.geom_type().as_u64())
			.context("Failed to write geometry type")?;

		writer
			.write_pbf_key(4, 2)
			.context("Failed to write PBF key for geometry data")?;
		writer
			.write_pbf_packed_uint32(feature.geometry())
			.context("Failed to write geometry data")?;

		self.features.push(writer.into_blob());
		Ok(())
	}

	/// Serializes the layer. Fields are written in the order version, name, features, keys,
	/// values, extent.
	///
	/// # Errors
	/// Returns an error if writing fails.
	pub fn to_blob(&self) -> Result<Blob> {
		trace!(
			"encoding layer '{}' with {} features, {} keys and {} values",
			self.name,
			self.features.len(),
			self.keys.len(),
			self.values.len()
		);

		let mut writer = ValueWriterBlob::new_le();

		writer
			.write_pbf_key(15, 0)
			.context("Failed to write PBF key for version")?;
		writer
			.write_varint(u64::from(self.version))
			.context("Failed to write version")?;

		writer
			.write_pbf_key(1, 2)
			.context("Failed to write PBF key for layer name")?;
		writer
			.write_pbf_string(&self.name)
			.context("Failed to write layer name")?;

		for feature in &self.features {
			writer
				.write_pbf_key(2, 2)
				.context("Failed to write PBF key for feature")?;
			writer.write_pbf_blob(feature).context("Failed to write feature blob")?;
		}

		for key in self.keys.iter() {
			writer
				.write_pbf_key(3, 2)
				.context("Failed to write PBF key for property key")?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.values.iter() {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for property value")?;
			writer
				.write_pbf_blob(value)
				.context("Failed to write property value blob")?;
		}

		writer
			.write_pbf_key(5, 0)
			.context("Failed to write PBF key for extent")?;
		writer
			.write_varint(u64::from(self.extent))
			.context("Failed to write extent")?;

		Ok(writer.into_blob())
	}
}
