use std::{collections::HashMap, hash::Hash};

/// An insertion-ordered set that hands out the index of each entry, used for the key and value
/// tables of a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedSet<T>
where
	T: Clone + Eq + Hash,
{
	list: Vec<T>,
	map: HashMap<T, u32>,
}

impl<T> IndexedSet<T>
where
	T: Clone + Eq + Hash,
{
	#[must_use]
	pub fn new() -> IndexedSet<T> {
		IndexedSet {
			list: Vec::new(),
			map: HashMap::new(),
		}
	}

	/// Returns the index of `entry`, inserting it at the end if it is new.
	pub fn add(&mut self, entry: T) -> u32 {
		if let Some(index) = self.map.get(&entry) {
			return *index;
		}
		#[allow(clippy::cast_possible_truncation)]
		let index = self.list.len() as u32;
		self.map.insert(entry.clone(), index);
		self.list.push(entry);
		index
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
		self.list.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.list.len()
	}
}

impl<T: Clone + Eq + Hash> Default for IndexedSet<T> {
	fn default() -> IndexedSet<T> {
		IndexedSet::new()
	}
}
