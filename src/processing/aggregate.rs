//! Global term ranking across all documents

use std::collections::HashMap;

use crate::core::{RankedTerm, TermVector};

/// Sums term counts and ranks them by descending total.
///
/// Equal totals keep first-seen order: document order first, then the
/// order terms first appear inside a document.
pub fn aggregate_terms(vectors: &[TermVector], top_k: Option<usize>) -> Vec<RankedTerm> {
	let mut index: HashMap<&str, usize> = HashMap::new();
	let mut ranked: Vec<RankedTerm> = Vec::new();

	for vector in vectors {
		for (term, count) in vector.iter() {
			match index.get(term) {
				Some(&pos) => ranked[pos].count += count as u64,
				None => {
					index.insert(term, ranked.len());
					ranked.push(RankedTerm {
						term: term.to_string(),
						count: count as u64,
					});
				}
			}
		}
	}

	// sort_by is stable, so ties stay in first-seen order
	ranked.sort_by(|a, b| b.count.cmp(&a.count));

	if let Some(k) = top_k {
		ranked.truncate(k);
	}
	ranked
}
