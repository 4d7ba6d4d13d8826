use std::fmt::Display;
use thiserror::Error;

/// Result type used throughout the vector tile decoder.
pub type Result<T> = std::result::Result<T, VectorTileError>;

/// The two per-layer lookup tables a tag index can point into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
	Key,
	Value,
}

impl Display for TableKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			TableKind::Key => "key",
			TableKind::Value => "value",
		})
	}
}

/// Everything that can go wrong while decoding a tile.
///
/// All failures are deterministic functions of the input bytes; callers decide whether to skip
/// the failing layer or feature and carry on with its siblings.
#[derive(Debug, Error)]
pub enum VectorTileError {
	/// The container schema is violated or the protobuf encoding itself is malformed.
	#[error("format error: {0:#}")]
	Format(anyhow::Error),

	/// The layer declares a version other than 1 or 2.
	#[error("unsupported vector tile version {0}, only versions 1 and 2 are supported")]
	Version(u32),

	/// The geometry command stream breaks the encoding rules.
	#[error("geometry error: {0}")]
	Geometry(String),

	/// A tag refers past the end of the layer's key or value table.
	#[error("{table} index {index} out of range, table has {size} entries")]
	Index { table: TableKind, index: u32, size: usize },

	/// The caller asked for something the object cannot provide, e.g. decoding a polygon as points.
	#[error("precondition violated: {0}")]
	Precondition(String),
}

impl VectorTileError {
	pub(crate) fn format(message: impl Display) -> Self {
		VectorTileError::Format(anyhow::anyhow!("{message}"))
	}

	pub(crate) fn geometry(message: impl Into<String>) -> Self {
		VectorTileError::Geometry(message.into())
	}
}

impl From<anyhow::Error> for VectorTileError {
	fn from(error: anyhow::Error) -> Self {
		VectorTileError::Format(error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::Context;

	#[test]
	fn wire_errors_become_format_errors() {
		let wire: anyhow::Result<()> = Err(anyhow::anyhow!("Varint too long")).context("Failed to read PBF key");
		let error = VectorTileError::from(wire.unwrap_err());
		assert!(matches!(error, VectorTileError::Format(_)));
		assert_eq!(error.to_string(), "format error: Failed to read PBF key: Varint too long");
	}

	#[test]
	fn display_messages() {
		assert_eq!(
			VectorTileError::Version(3).to_string(),
			"unsupported vector tile version 3, only versions 1 and 2 are supported"
		);
		assert_eq!(
			VectorTileError::Index {
				table: TableKind::Value,
				index: 9,
				size: 2
			}
			.to_string(),
			"value index 9 out of range, table has 2 entries"
		);
		assert_eq!(
			VectorTileError::geometry("too few points in geometry").to_string(),
			"geometry error: too few points in geometry"
		);
	}
}
