//! Bag-of-words term vectors

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Term-frequency map for one document.
///
/// Entries are kept in first-seen order. A second index sorted by term
/// backs the merged sparse dot product, so no dense vocabulary matrix is
/// ever built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
	entries: Vec<(String, u32)>,
	sorted: Vec<usize>,
	norm: f64,
}

impl TermVector {
	/// Counts tokens, preserving first-occurrence order
	pub fn from_tokens<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::from_counts(tokens.into_iter().map(|t| (t, 1)))
	}

	/// Builds a vector from (term, count) pairs; repeated terms are summed
	pub fn from_counts<I, S>(counts: I) -> Self
	where
		I: IntoIterator<Item = (S, u32)>,
		S: AsRef<str>,
	{
		let mut index: HashMap<String, usize> = HashMap::new();
		let mut entries: Vec<(String, u32)> = Vec::new();

		for (term, count) in counts {
			if count == 0 {
				continue;
			}
			let term = term.as_ref();
			match index.get(term) {
				Some(&pos) => entries[pos].1 += count,
				None => {
					index.insert(term.to_string(), entries.len());
					entries.push((term.to_string(), count));
				}
			}
		}

		let mut sorted: Vec<usize> = (0..entries.len()).collect();
		sorted.sort_by(|&a, &b| entries[a].0.cmp(&entries[b].0));

		let norm = entries
			.iter()
			.map(|(_, c)| (*c as f64) * (*c as f64))
			.sum::<f64>()
			.sqrt();

		Self { entries, sorted, norm }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Euclidean norm of the count vector
	pub fn norm(&self) -> f64 {
		self.norm
	}

	/// Sum of all counts
	pub fn total(&self) -> u64 {
		self.entries.iter().map(|(_, c)| *c as u64).sum()
	}

	pub fn get(&self, term: &str) -> Option<u32> {
		self.sorted
			.binary_search_by(|&pos| self.entries[pos].0.as_str().cmp(term))
			.ok()
			.map(|found| self.entries[self.sorted[found]].1)
	}

	/// Terms in first-seen order
	pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
		self.entries.iter().map(|(t, c)| (t.as_str(), *c))
	}

	/// Dot product by merging both term-sorted indices
	pub fn dot(&self, other: &Self) -> f64 {
		let (mut a, mut b) = (0, 0);
		let mut sum = 0.0;

		while a < self.sorted.len() && b < other.sorted.len() {
			let (ta, ca) = &self.entries[self.sorted[a]];
			let (tb, cb) = &other.entries[other.sorted[b]];
			match ta.cmp(tb) {
				Ordering::Less => a += 1,
				Ordering::Greater => b += 1,
				Ordering::Equal => {
					sum += (*ca as f64) * (*cb as f64);
					a += 1;
					b += 1;
				}
			}
		}

		sum
	}
}

/// Globally ranked term with its summed count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTerm {
	pub term: String,
	pub count: u64,
}
