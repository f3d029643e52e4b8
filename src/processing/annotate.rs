//! Internal node naming from document categories

use std::collections::HashMap;

use crate::core::{NodeId, Tree};

/// Names each unnamed internal node after the categories of the leaves
/// beneath it. Returns the number of nodes named.
///
/// A category held by more than half of the categorized leaves gives
/// `CAT_cluster`; otherwise the two most common give `A_B_mixed`. Repeated
/// names get `_2`, `_3`, ... suffixes in arena order.
pub fn name_internal_nodes(tree: &mut Tree, categories: &[Option<String>]) -> usize {
	let internal: Vec<NodeId> = tree
		.ids()
		.filter(|&id| !tree.node(id).is_leaf() && tree.name(id).is_none())
		.collect();

	let proposed: Vec<(NodeId, String)> = internal
		.into_iter()
		.filter_map(|id| dominant_category(&tree.leaves_under(id), categories).map(|name| (id, name)))
		.collect();

	let mut seen: HashMap<String, usize> = HashMap::new();
	let named = proposed.len();

	for (id, name) in proposed {
		let count = seen.entry(name.clone()).or_insert(0);
		*count += 1;
		let unique = if *count == 1 {
			name
		} else {
			format!("{}_{}", name, count)
		};
		tree.set_name(id, unique);
	}

	named
}

fn dominant_category(leaves: &[usize], categories: &[Option<String>]) -> Option<String> {
	let mut counts: Vec<(&str, usize)> = Vec::new();
	let mut total = 0;

	for &leaf in leaves {
		let Some(Some(category)) = categories.get(leaf) else {
			continue;
		};
		let category = category.trim();
		if category.is_empty() {
			continue;
		}
		total += 1;
		match counts.iter_mut().find(|(c, _)| *c == category) {
			Some(entry) => entry.1 += 1,
			None => counts.push((category, 1)),
		}
	}

	// stable: equal counts keep first-seen order
	counts.sort_by(|a, b| b.1.cmp(&a.1));

	let (top, top_count) = *counts.first()?;
	if top_count * 2 > total || counts.len() == 1 {
		Some(format!("{}_cluster", top))
	} else {
		Some(format!("{}_{}_mixed", top, counts[1].0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Branch;

	fn cats(values: &[Option<&str>]) -> Vec<Option<String>> {
		values.iter().map(|v| v.map(str::to_string)).collect()
	}

	#[test]
	fn majority_and_mixed_names() {
		let categories = cats(&[Some("SPORTS"), Some("SPORTS"), Some("POLITICS"), Some("TECH")]);
		assert_eq!(dominant_category(&[0, 1, 2], &categories).as_deref(), Some("SPORTS_cluster"));
		assert_eq!(dominant_category(&[1, 2, 3], &categories).as_deref(), Some("SPORTS_POLITICS_mixed"));
		assert_eq!(dominant_category(&[0, 2], &categories).as_deref(), Some("SPORTS_POLITICS_mixed"));
	}

	#[test]
	fn uncategorized_leaves_are_ignored() {
		let categories = cats(&[None, Some("TECH"), Some(" ")]);
		assert_eq!(dominant_category(&[0, 1, 2], &categories).as_deref(), Some("TECH_cluster"));
		assert_eq!(dominant_category(&[0, 2], &categories), None);
	}

	#[test]
	fn duplicate_names_get_counters() {
		let mut tree = Tree::new();
		let leaves: Vec<NodeId> = (0..4).map(|i| tree.add_leaf(i, format!("l{}", i))).collect();
		let u = tree.add_internal(Branch::new(leaves[0], 1.0), Branch::new(leaves[1], 1.0), None);
		let root = tree.add_internal(
			Branch::new(u, 1.0),
			Branch::new(leaves[2], 1.0),
			Some(Branch::new(leaves[3], 1.0)),
		);
		tree.set_root(root);

		let categories = cats(&[Some("A"), Some("A"), Some("A"), Some("B")]);
		assert_eq!(name_internal_nodes(&mut tree, &categories), 2);
		assert_eq!(tree.name(u), Some("A_cluster"));
		assert_eq!(tree.name(root), Some("A_cluster_2"));
	}
}
