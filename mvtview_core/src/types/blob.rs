//! This module provides the [`Blob`] struct, an owned byte buffer produced by the tile encoder.
//!
//! # Examples
//!
//! ```rust
//! use mvtview_core::Blob;
//!
//! let blob = Blob::from(vec![0x0A, 0x01, b'x']);
//! assert_eq!(blob.len(), 3);
//! assert_eq!(blob.as_slice(), &[0x0A, 0x01, b'x']);
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`] holding encoded protobuf data.
///
/// Decoders never take ownership of a `Blob`; they borrow [`Blob::as_slice`] instead.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the contents as a byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the `Blob` and returns the underlying vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the contents as lowercase hex pairs separated by spaces, handy in test failures.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Length in bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(vec: Vec<u8>) -> Self {
		Blob(vec)
	}
}

impl From<&[u8]> for Blob {
	fn from(slice: &[u8]) -> Self {
		Blob(slice.to_vec())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
	}
}
