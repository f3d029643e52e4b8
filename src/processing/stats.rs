//! Tree statistics, threshold clusters and category counts

use serde::{Deserialize, Serialize};

use crate::core::{Document, Tree, TreeNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeStatistics {
	pub num_tips: usize,
	pub num_internal_nodes: usize,
	pub total_branch_length: f64,
	/// Longest leaf-to-leaf path
	pub max_tip_distance: f64,
	/// Negative limb lengths replaced by zero during joining
	pub clamped_branches: usize,
}

impl TreeStatistics {
	pub fn compute(tree: &Tree, clamped_branches: usize) -> Self {
		let distances = tree.leaf_distances();
		let max_tip_distance = distances
			.as_array()
			.iter()
			.copied()
			.fold(0.0_f64, f64::max);

		Self {
			num_tips: tree.leaf_count(),
			num_internal_nodes: tree.internal_count(),
			total_branch_length: tree.total_length(),
			max_tip_distance,
			clamped_branches,
		}
	}
}

/// Groups leaves joined through branches no longer than `threshold`.
///
/// Clusters are ordered by their first leaf, members by input position.
pub fn find_clusters(tree: &Tree, threshold: f64) -> Vec<Vec<String>> {
	if tree.is_empty() {
		return Vec::new();
	}
	let mut parent: Vec<usize> = (0..tree.len()).collect();

	fn find(parent: &mut [usize], mut x: usize) -> usize {
		while parent[x] != x {
			parent[x] = parent[parent[x]];
			x = parent[x];
		}
		x
	}

	for id in tree.ids() {
		for branch in tree.node(id).branches() {
			if branch.length <= threshold {
				let a = find(&mut parent, id.0);
				let b = find(&mut parent, branch.child.0);
				if a != b {
					parent[a.max(b)] = a.min(b);
				}
			}
		}
	}

	let mut leaves: Vec<(usize, usize, &str)> = tree
		.ids()
		.filter_map(|id| match tree.node(id) {
			TreeNode::Leaf { index, label } => Some((*index, id.0, label.as_str())),
			TreeNode::Internal { .. } => None,
		})
		.collect();
	leaves.sort_by_key(|(index, _, _)| *index);

	let mut groups: Vec<(usize, Vec<String>)> = Vec::new();
	for (_, slot, label) in leaves {
		let group = find(&mut parent, slot);
		match groups.iter_mut().find(|(g, _)| *g == group) {
			Some((_, members)) => members.push(label.to_string()),
			None => groups.push((group, vec![label.to_string()])),
		}
	}

	groups.into_iter().map(|(_, members)| members).collect()
}

/// Documents per category in first-seen order; missing categories count as "Unknown"
pub fn category_distribution(documents: &[Document]) -> Vec<(String, usize)> {
	let mut counts: Vec<(String, usize)> = Vec::new();
	for doc in documents {
		let category = doc
			.category
			.as_deref()
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.unwrap_or("Unknown");
		match counts.iter_mut().find(|(c, _)| c == category) {
			Some(entry) => entry.1 += 1,
			None => counts.push((category.to_string(), 1)),
		}
	}
	counts
}
