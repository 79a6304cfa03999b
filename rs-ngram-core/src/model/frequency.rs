use std::collections::HashMap;
use std::hash::Hash;

use super::extractor::NGram;

/// Exact occurrence counts of keys of one kind (n-grams of a fixed order,
/// or next tokens of a single context).
///
/// Keys are remembered in the order they were first seen, which gives
/// ranked queries a stable tie-break and makes iteration deterministic.
///
/// # Invariants
/// - Every stored count is >= 1
/// - `index[key]` is the position of `key` in `entries`
/// - `total` is the sum of all counts
#[derive(Clone, Debug)]
pub struct FrequencyTable<K = NGram> {
	entries: Vec<(K, usize)>,
	index: HashMap<K, usize>,
	total: usize,
}

impl<K> Default for FrequencyTable<K> {
	fn default() -> Self {
		Self { entries: Vec::new(), index: HashMap::new(), total: 0 }
	}
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Counts every key of a finite sequence.
	///
	/// An empty sequence gives an empty table.
	pub fn count_all<I: IntoIterator<Item = K>>(keys: I) -> Self {
		let mut table = Self::new();
		for key in keys {
			table.add(key, 1);
		}
		table
	}

	/// Records `occurrence` more observations of `key`.
	///
	/// Adding zero occurrences is a no-op, so no zero count is ever stored.
	pub fn add(&mut self, key: K, occurrence: usize) {
		if occurrence == 0 {
			return;
		}
		match self.index.get(&key) {
			Some(&position) => self.entries[position].1 += occurrence,
			None => {
				self.index.insert(key.clone(), self.entries.len());
				self.entries.push((key, occurrence));
			}
		}
		self.total += occurrence;
	}

	/// Returns the count of `key`, 0 if it was never seen.
	pub fn count<Q>(&self, key: &Q) -> usize
	where
		K: std::borrow::Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.index.get(key).map_or(0, |&position| self.entries[position].1)
	}

	/// Returns the `n` most frequent keys with their counts.
	///
	/// Sorted by count descending; equal counts keep first-seen order.
	/// The result holds `min(n, self.len())` entries.
	pub fn top_k(&self, n: usize) -> Vec<(K, usize)> {
		let mut ranked: Vec<&(K, usize)> = self.entries.iter().collect();
		// Stable sort preserves first-seen order among ties
		ranked.sort_by(|a, b| b.1.cmp(&a.1));
		ranked.into_iter().take(n).cloned().collect()
	}

	/// Iterates over `(key, count)` in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
		self.entries.iter().map(|(key, count)| (key, *count))
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
