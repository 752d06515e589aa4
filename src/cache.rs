//! Bookkeeping for fetched pages: the bounded fragment cache and the set of requests still in flight.

use hashbrown::HashMap;
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::trace;

/// Page text keyed by path, evicted in insertion order.
///
/// Lookups do not refresh an entry's position, so this is FIFO and not LRU.
#[derive(Debug)]
pub struct FragmentCache {
	entries: IndexMap<String, Rc<str>>,
	capacity: usize,
}

impl FragmentCache {
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		Self { entries: IndexMap::with_capacity(capacity + 1), capacity }
	}

	#[must_use]
	pub fn get(&self, path: &str) -> Option<Rc<str>> {
		self.entries.get(path).cloned()
	}

	#[must_use]
	pub fn contains(&self, path: &str) -> bool {
		self.entries.contains_key(path)
	}

	/// Stores `text` for `path` and returns the path that had to make room for it, if any.
	///
	/// Replacing the text of a cached path keeps its original insertion position.
	pub fn insert(&mut self, path: impl Into<String>, text: impl Into<Rc<str>>) -> Option<String> {
		self.entries.insert(path.into(), text.into());
		if self.entries.len() > self.capacity {
			let (evicted, _) = self.entries.shift_remove_index(0)?;
			trace!(%evicted, "Evicted oldest cached page.");
			Some(evicted)
		} else {
			None
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Cached paths, oldest first.
	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

/// Paths with an outstanding request, each carrying what should happen once it settles.
#[derive(Debug)]
pub struct InFlight<T> {
	pending: HashMap<String, T>,
}

impl<T> Default for InFlight<T> {
	fn default() -> Self {
		Self { pending: HashMap::new() }
	}
}

impl<T> InFlight<T> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks `path` as being fetched.
	///
	/// Returns `false` without touching the existing payload if a request for `path` is already outstanding.
	pub fn begin(&mut self, path: &str, payload: T) -> bool {
		if self.pending.contains_key(path) {
			return false;
		}
		self.pending.insert(path.to_owned(), payload);
		true
	}

	/// The payload of an outstanding request, for callers that want to amend it.
	pub fn get_mut(&mut self, path: &str) -> Option<&mut T> {
		self.pending.get_mut(path)
	}

	/// Clears the marker for `path`. This must happen whether the request succeeded or not.
	pub fn finish(&mut self, path: &str) -> Option<T> {
		self.pending.remove(path)
	}

	#[must_use]
	pub fn contains(&self, path: &str) -> bool {
		self.pending.contains_key(path)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn evicts_the_oldest_insert() {
		let mut cache = FragmentCache::new(3);
		assert_eq!(cache.insert("/a", "A"), None);
		assert_eq!(cache.insert("/b", "B"), None);
		assert_eq!(cache.insert("/c", "C"), None);

		// Reading does not count as use.
		assert_eq!(cache.get("/a").as_deref(), Some("A"));

		assert_eq!(cache.insert("/d", "D"), Some("/a".to_owned()));
		assert_eq!(cache.len(), 3);
		assert_eq!(cache.paths().collect::<Vec<_>>(), ["/b", "/c", "/d"]);
		assert!(!cache.contains("/a"));
	}

	#[test]
	fn replacing_keeps_position() {
		let mut cache = FragmentCache::new(2);
		cache.insert("/a", "A");
		cache.insert("/b", "B");
		assert_eq!(cache.insert("/a", "A2"), None);
		assert_eq!(cache.get("/a").as_deref(), Some("A2"));
		assert_eq!(cache.insert("/c", "C"), Some("/a".to_owned()));
	}

	#[test]
	fn in_flight_rejects_duplicates_until_finished() {
		let mut in_flight = InFlight::new();
		assert!(in_flight.begin("/a", 1));
		assert!(!in_flight.begin("/a", 2));
		assert_eq!(in_flight.len(), 1);
		assert_eq!(in_flight.finish("/a"), Some(1));
		assert!(in_flight.is_empty());
		assert!(in_flight.begin("/a", 3));
	}
}
