use super::{
	error::{Result, VectorTileError},
	geometry::{Geometry, decode_geometry},
	geometry_type::GeomType,
	handler::GeometryHandler,
	layer::VectorTileLayer,
	value::PropertyValue,
};
use anyhow::Context;
use byteorder::LE;
use log::trace;
use mvtview_core::io::{ValueReader, ValueReaderSlice};

/// A feature of a layer.
///
/// The feature borrows its layer (`'l`), which resolves the tag indexes into keys and values,
/// and the tile buffer (`'a`), which holds the packed tag list and the geometry. Nothing is
/// copied out of the buffer; tags are decoded each time they are iterated. Unknown fields are
/// skipped.
#[derive(Clone, Debug)]
pub struct VectorTileFeature<'l, 'a> {
	layer: &'l VectorTileLayer<'a>,
	data: &'a [u8],
	id: Option<u64>,
	tags: &'a [u8],
	num_tags: usize,
	geom_type: GeomType,
	geometry: &'a [u8],
}

impl<'l, 'a> VectorTileFeature<'l, 'a> {
	/// Decodes the fields of a feature message. The geometry stays undecoded.
	///
	/// # Errors
	/// Returns [`VectorTileError::Format`] if the message is malformed or the tag list has an
	/// odd length.
	pub fn new(layer: &'l VectorTileLayer<'a>, data: &'a [u8]) -> Result<VectorTileFeature<'l, 'a>> {
		let mut reader = ValueReaderSlice::new_le(data);

		let mut id = None;
		let mut tags: &'a [u8] = &[];
		let mut num_tags = 0;
		let mut geom_type = GeomType::Unknown;
		let mut geometry: &'a [u8] = &[];

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => {
					let mut tag_reader = reader.read_pbf_sub_slice_reader().context("Failed to read tag IDs")?;
					num_tags = count_tags(&mut tag_reader)?;
					tags = tag_reader.as_slice();
				}
				(3, 0) => geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?),
				(4, 2) => geometry = reader.read_pbf_slice().context("Failed to read geometry data")?,
				(f, w) => {
					trace!("skipping unknown feature field ({f}) with wire type ({w})");
					reader.skip_pbf_field(w).context("Failed to skip unknown feature field")?;
				}
			}
		}

		if !num_tags.is_multiple_of(2) {
			return Err(VectorTileError::format(format!(
				"feature has an odd number of tag ids ({num_tags})"
			)));
		}

		Ok(VectorTileFeature {
			layer,
			data,
			id,
			tags,
			num_tags,
			geom_type,
			geometry,
		})
	}

	/// The feature id, or 0 if the feature has none.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id.unwrap_or(0)
	}

	#[must_use]
	pub fn has_id(&self) -> bool {
		self.id.is_some()
	}

	#[must_use]
	pub fn geom_type(&self) -> GeomType {
		self.geom_type
	}

	#[must_use]
	pub fn geometry(&self) -> Geometry<'a> {
		Geometry::new(self.geometry, self.geom_type)
	}

	#[must_use]
	pub fn layer(&self) -> &'l VectorTileLayer<'a> {
		self.layer
	}

	/// The encoded feature message.
	#[must_use]
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	#[must_use]
	pub fn num_properties(&self) -> usize {
		self.num_tags / 2
	}

	/// Raw `(key_index, value_index)` pairs of the tag list, decoded on the fly.
	pub fn property_indexes(&self) -> TagIter<'a> {
		TagIter {
			reader: ValueReaderSlice::new_le(self.tags),
			failed: false,
		}
	}

	/// Properties resolved through the layer's key and value tables.
	///
	/// Each item fails with [`VectorTileError::Index`] if its tag points outside a table.
	pub fn properties(&self) -> impl Iterator<Item = Result<(&'a str, &'l PropertyValue<'a>)>> + '_ {
		let layer = self.layer;
		self
			.property_indexes()
			.map(move |pair| -> Result<(&'a str, &'l PropertyValue<'a>)> {
				let (key, value) = pair?;
				Ok((layer.key(key)?, layer.value(value)?))
			})
	}

	/// Calls `f` for every property until it returns `false`.
	///
	/// Returns `false` if `f` stopped the iteration early.
	///
	/// # Errors
	/// Returns the first error of [`VectorTileFeature::properties`].
	pub fn for_each_property<F>(&self, mut f: F) -> Result<bool>
	where
		F: FnMut(&'a str, &PropertyValue<'a>) -> bool,
	{
		for property in self.properties() {
			let (key, value) = property?;
			if !f(key, value) {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// Decodes the geometry into `handler`, see [`decode_geometry`].
	///
	/// # Errors
	/// Returns [`VectorTileError::Geometry`] if the geometry is invalid or of unknown type.
	pub fn decode_geometry<H: GeometryHandler + ?Sized>(&self, strict: bool, handler: &mut H) -> Result<()> {
		decode_geometry(self.geometry(), strict, handler)
	}
}

/// Validates a packed tag list and returns the number of ids in it.
fn count_tags(reader: &mut ValueReaderSlice<'_, LE>) -> Result<usize> {
	let mut count = 0;
	while reader.has_remaining() {
		read_tag(reader)?;
		count += 1;
	}
	Ok(count)
}

fn read_tag(reader: &mut ValueReaderSlice<'_, LE>) -> Result<u32> {
	let value = reader.read_varint().context("Failed to read tag ID")?;
	Ok(u32::try_from(value).context("Tag ID does not fit into 32 bits")?)
}

fn read_tag_pair(reader: &mut ValueReaderSlice<'_, LE>) -> Result<(u32, u32)> {
	Ok((read_tag(reader)?, read_tag(reader)?))
}

/// Iterator over the `(key_index, value_index)` pairs of a feature's packed tag list.
#[derive(Clone, Debug)]
pub struct TagIter<'a> {
	reader: ValueReaderSlice<'a, LE>,
	failed: bool,
}

impl Iterator for TagIter<'_> {
	type Item = Result<(u32, u32)>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || !self.reader.has_remaining() {
			return None;
		}
		let pair = read_tag_pair(&mut self.reader);
		self.failed = pair.is_err();
		Some(pair)
	}
}
