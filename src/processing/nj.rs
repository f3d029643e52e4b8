//! Neighbor-joining tree construction
//!
//! Works on an active set of nodes, each owning a slot in a working copy of
//! the distance matrix. Every iteration picks the pair minimizing the
//! Q-criterion `(m - 2) * d(i, j) - r(i) - r(j)`, replaces it with a new
//! internal node, and stops once three nodes remain; those are joined by a
//! single trifurcating root.
//!
//! Enumeration order is the order of the active slots. A merged node takes
//! the lower slot of its pair, so exact Q ties always resolve to the
//! lexicographically lowest `(i, j)` position pair.

use ndarray::Array2;
use rayon::prelude::*;

use crate::config::PARALLEL_SCAN_THRESHOLD;
use crate::core::{Branch, CoreError, CoreResult, DistanceMatrix, NodeId, Tree};
use crate::ui;

#[derive(Debug, Clone, Copy)]
pub struct NjOptions {
	/// Replace negative limb lengths with zero
	pub clamp_negative: bool,
	/// Scan Q on the rayon pool once this many nodes are active
	pub parallel_threshold: usize,
}

impl Default for NjOptions {
	fn default() -> Self {
		Self {
			clamp_negative: true,
			parallel_threshold: PARALLEL_SCAN_THRESHOLD,
		}
	}
}

/// One agglomeration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Join {
	pub left: NodeId,
	pub right: NodeId,
	pub parent: NodeId,
	pub q: f64,
	pub left_length: f64,
	pub right_length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
	pub tree: Tree,
	/// Agglomerations in the order they happened
	pub joins: Vec<Join>,
	/// Number of limb lengths that were negative and got clamped
	pub clamped: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
	q: f64,
	p: usize,
	r: usize,
}

/// Lower Q wins, equal Q falls back to the lower position pair
fn better(a: Candidate, b: Candidate) -> Candidate {
	if b.q < a.q || (b.q == a.q && (b.p, b.r) < (a.p, a.r)) {
		b
	} else {
		a
	}
}

struct ActiveSet {
	dist: Array2<f64>,
	divergence: Vec<f64>,
	nodes: Vec<NodeId>,
	/// Active slots in enumeration order
	order: Vec<usize>,
}

impl ActiveSet {
	fn new(matrix: &DistanceMatrix, leaves: Vec<NodeId>) -> Self {
		let n = matrix.order();
		Self {
			dist: matrix.as_array().to_owned(),
			divergence: (0..n).map(|i| matrix.row_sum(i)).collect(),
			nodes: leaves,
			order: (0..n).collect(),
		}
	}

	fn len(&self) -> usize {
		self.order.len()
	}

	fn distance(&self, p: usize, r: usize) -> f64 {
		self.dist[[self.order[p], self.order[r]]]
	}

	/// Best partner for position `p` among the positions after it
	fn row_best(&self, p: usize) -> Option<Candidate> {
		let m = self.order.len();
		let factor = (m - 2) as f64;
		let i = self.order[p];
		let mut best: Option<Candidate> = None;

		for r in (p + 1)..m {
			let j = self.order[r];
			let q = factor * self.dist[[i, j]] - self.divergence[i] - self.divergence[j];
			if best.map_or(true, |b| q < b.q) {
				best = Some(Candidate { q, p, r });
			}
		}
		best
	}

	fn select_pair(&self, parallel: bool) -> Option<Candidate> {
		let rows = self.order.len().saturating_sub(1);
		if parallel {
			(0..rows)
				.into_par_iter()
				.filter_map(|p| self.row_best(p))
				.reduce_with(better)
		} else {
			(0..rows).filter_map(|p| self.row_best(p)).reduce(better)
		}
	}

	/// Replaces positions `p` and `r` (p < r) with `parent` at position `p`
	fn merge(&mut self, p: usize, r: usize, parent: NodeId) {
		let i = self.order[p];
		let j = self.order[r];
		let dij = self.dist[[i, j]];
		let mut parent_divergence = 0.0;

		for &k in &self.order {
			if k == i || k == j {
				continue;
			}
			let dik = self.dist[[i, k]];
			let djk = self.dist[[j, k]];
			let duk = 0.5 * (dik + djk - dij);

			self.divergence[k] += duk - dik - djk;
			self.dist[[i, k]] = duk;
			self.dist[[k, i]] = duk;
			parent_divergence += duk;
		}

		self.divergence[i] = parent_divergence;
		self.nodes[i] = parent;
		self.order.remove(r);
	}
}

#[derive(Debug, Clone, Default)]
pub struct NeighborJoining {
	options: NjOptions,
}

impl NeighborJoining {
	pub fn new(options: NjOptions) -> Self {
		Self { options }
	}

	/// Builds the tree for `matrix`, whose rows are labeled by `labels`
	pub fn build(&self, matrix: &DistanceMatrix, labels: &[String]) -> CoreResult<Joined> {
		let n = matrix.order();
		if n != labels.len() {
			return Err(CoreError::LabelMismatch {
				order: n,
				labels: labels.len(),
			});
		}
		if n == 0 {
			return Err(CoreError::EmptyInput);
		}
		matrix.validate()?;

		ui::debug(&format!("Neighbor joining over {} leaves", n));

		let mut tree = Tree::with_capacity(n);
		let leaves: Vec<NodeId> = labels
			.iter()
			.enumerate()
			.map(|(index, label)| tree.add_leaf(index, label.as_str()))
			.collect();

		let mut joins = Vec::with_capacity(n.saturating_sub(3));
		let mut clamped = 0;

		match n {
			1 => tree.set_root(leaves[0]),
			2 => {
				let half = matrix.get(0, 1) / 2.0;
				let root = tree.add_internal(
					Branch::new(leaves[0], half),
					Branch::new(leaves[1], half),
					None,
				);
				tree.set_root(root);
			}
			_ => {
				let mut active = ActiveSet::new(matrix, leaves);

				while active.len() > 3 {
					let m = active.len();
					let parallel = m >= self.options.parallel_threshold;
					let best = active.select_pair(parallel).ok_or_else(|| {
						CoreError::InvariantViolation(format!("no candidate pair among {} active nodes", m))
					})?;

					let (i, j) = (active.order[best.p], active.order[best.r]);
					let dij = active.dist[[i, j]];
					let raw_left =
						0.5 * dij + (active.divergence[i] - active.divergence[j]) / (2.0 * (m - 2) as f64);
					let raw_right = dij - raw_left;
					let left_length = self.limb(raw_left, &mut clamped);
					let right_length = self.limb(raw_right, &mut clamped);

					let (left, right) = (active.nodes[i], active.nodes[j]);
					let parent = tree.add_internal(
						Branch::new(left, left_length),
						Branch::new(right, right_length),
						None,
					);
					joins.push(Join {
						left,
						right,
						parent,
						q: best.q,
						left_length,
						right_length,
					});

					active.merge(best.p, best.r, parent);
				}

				if active.len() != 3 {
					return Err(CoreError::InvariantViolation(format!(
						"active set ended with {} nodes",
						active.len()
					)));
				}

				let (dab, dac, dbc) = (active.distance(0, 1), active.distance(0, 2), active.distance(1, 2));
				let la = self.limb((dab + dac - dbc) / 2.0, &mut clamped);
				let lb = self.limb((dab + dbc - dac) / 2.0, &mut clamped);
				let lc = self.limb((dac + dbc - dab) / 2.0, &mut clamped);

				let slot = |p: usize| active.nodes[active.order[p]];
				let root = tree.add_internal(
					Branch::new(slot(0), la),
					Branch::new(slot(1), lb),
					Some(Branch::new(slot(2), lc)),
				);
				tree.set_root(root);
			}
		}

		tree.check_shape(n)?;

		if clamped > 0 {
			ui::debug(&format!("Clamped {} negative branch lengths to zero", clamped));
		}

		Ok(Joined { tree, joins, clamped })
	}

	fn limb(&self, raw: f64, clamped: &mut usize) -> f64 {
		if self.options.clamp_negative && raw < 0.0 {
			*clamped += 1;
			0.0
		} else {
			raw
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::TreeNode;

	fn labels(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("t{}", i)).collect()
	}

	fn matrix(rows: &[&[f64]]) -> DistanceMatrix {
		DistanceMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
	}

	fn branch_to(tree: &Tree, parent: NodeId, child: NodeId) -> f64 {
		tree.node(parent)
			.branches()
			.find(|b| b.child == child)
			.map(|b| b.length)
			.unwrap()
	}

	#[test]
	fn single_leaf_is_the_root() {
		let joined = NeighborJoining::default()
			.build(&DistanceMatrix::zeros(1), &labels(1))
			.unwrap();
		assert_eq!(joined.tree.len(), 1);
		assert!(joined.tree.node(joined.tree.root().unwrap()).is_leaf());
		assert!(joined.joins.is_empty());
	}

	#[test]
	fn two_leaves_split_the_distance() {
		let joined = NeighborJoining::default()
			.build(&matrix(&[&[0.0, 0.8], &[0.8, 0.0]]), &labels(2))
			.unwrap();
		let root = joined.tree.root().unwrap();
		let lengths: Vec<f64> = joined.tree.node(root).branches().map(|b| b.length).collect();
		assert_eq!(lengths, vec![0.4, 0.4]);
	}

	#[test]
	fn three_leaves_use_three_point_formula() {
		let m = matrix(&[&[0.0, 0.5, 1.0], &[0.5, 0.0, 1.0], &[1.0, 1.0, 0.0]]);
		let joined = NeighborJoining::default().build(&m, &labels(3)).unwrap();
		let root = joined.tree.root().unwrap();
		let lengths: Vec<f64> = joined.tree.node(root).branches().map(|b| b.length).collect();
		assert_eq!(lengths, vec![0.25, 0.25, 0.75]);
		assert!(joined.joins.is_empty());
	}

	#[test]
	fn recovers_textbook_five_taxon_tree() {
		let m = matrix(&[
			&[0.0, 5.0, 9.0, 9.0, 8.0],
			&[5.0, 0.0, 10.0, 10.0, 9.0],
			&[9.0, 10.0, 0.0, 8.0, 7.0],
			&[9.0, 10.0, 8.0, 0.0, 3.0],
			&[8.0, 9.0, 7.0, 3.0, 0.0],
		]);
		let joined = NeighborJoining::default().build(&m, &labels(5)).unwrap();
		let tree = &joined.tree;

		assert_eq!(joined.joins.len(), 2);
		let first = joined.joins[0];
		assert_eq!((first.left, first.right), (NodeId(0), NodeId(1)));
		assert_eq!(first.q, -50.0);
		assert_eq!((first.left_length, first.right_length), (2.0, 3.0));

		let second = joined.joins[1];
		assert_eq!((second.left, second.right), (first.parent, NodeId(2)));
		assert_eq!(branch_to(tree, second.parent, first.parent), 3.0);
		assert_eq!(branch_to(tree, second.parent, NodeId(2)), 4.0);

		let root = tree.root().unwrap();
		assert_eq!(branch_to(tree, root, second.parent), 2.0);
		assert_eq!(branch_to(tree, root, NodeId(3)), 2.0);
		assert_eq!(branch_to(tree, root, NodeId(4)), 1.0);

		let recovered = tree.leaf_distances();
		for i in 0..5 {
			for j in 0..5 {
				assert!((recovered.get(i, j) - m.get(i, j)).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn ties_resolve_to_lowest_pair() {
		let m = DistanceMatrix::uniform(5, 1.0);
		let joined = NeighborJoining::default().build(&m, &labels(5)).unwrap();
		assert_eq!(joined.joins[0].left, NodeId(0));
		assert_eq!(joined.joins[0].right, NodeId(1));
		assert_eq!(joined.joins[1].left, joined.joins[0].parent);
		assert_eq!(joined.joins[1].right, NodeId(2));
	}

	fn non_additive() -> DistanceMatrix {
		matrix(&[
			&[0.0, 0.5, 1.0, 1.0, 1.0],
			&[0.5, 0.0, 3.0, 3.0, 3.0],
			&[1.0, 3.0, 0.0, 2.0, 2.0],
			&[1.0, 3.0, 2.0, 0.0, 2.0],
			&[1.0, 3.0, 2.0, 2.0, 0.0],
		])
	}

	#[test]
	fn negative_limbs_are_clamped_and_counted() {
		let joined = NeighborJoining::default().build(&non_additive(), &labels(5)).unwrap();
		assert_eq!(joined.clamped, 1);
		assert_eq!(joined.joins[0].left_length, 0.0);
		assert_eq!(joined.joins[0].right_length, 1.25);
		assert!(joined.tree.bipartitions().iter().all(|(_, len)| *len >= 0.0));
	}

	#[test]
	fn clamping_can_be_disabled() {
		let options = NjOptions {
			clamp_negative: false,
			..NjOptions::default()
		};
		let joined = NeighborJoining::new(options).build(&non_additive(), &labels(5)).unwrap();
		assert_eq!(joined.clamped, 0);
		assert_eq!(joined.joins[0].left_length, -0.75);
	}

	#[test]
	fn parallel_scan_matches_sequential() {
		let n = 40;
		let rows: Vec<Vec<f64>> = (0..n)
			.map(|i| {
				(0..n)
					.map(|j| {
						if i == j {
							0.0
						} else {
							1.0 + ((i * j + i + j) % 11) as f64 / 10.0
						}
					})
					.collect()
			})
			.collect();
		let m = DistanceMatrix::from_rows(rows).unwrap();

		let sequential = NeighborJoining::new(NjOptions {
			parallel_threshold: usize::MAX,
			..NjOptions::default()
		})
		.build(&m, &labels(n))
		.unwrap();
		let parallel = NeighborJoining::new(NjOptions {
			parallel_threshold: 0,
			..NjOptions::default()
		})
		.build(&m, &labels(n))
		.unwrap();

		assert_eq!(sequential, parallel);
	}

	#[test]
	fn rejects_label_mismatch_and_empty_input() {
		let err = NeighborJoining::default()
			.build(&DistanceMatrix::zeros(3), &labels(2))
			.unwrap_err();
		assert_eq!(err, CoreError::LabelMismatch { order: 3, labels: 2 });

		let err = NeighborJoining::default()
			.build(&DistanceMatrix::zeros(0), &[])
			.unwrap_err();
		assert_eq!(err, CoreError::EmptyInput);
	}

	#[test]
	fn general_case_shape() {
		let m = DistanceMatrix::uniform(7, 1.0);
		let joined = NeighborJoining::default().build(&m, &labels(7)).unwrap();
		assert_eq!(joined.tree.internal_count(), 5);
		assert_eq!(joined.tree.edge_count(), 11);
		assert_eq!(joined.joins.len(), 4);
		match joined.tree.node(joined.tree.root().unwrap()) {
			TreeNode::Internal { c, .. } => assert!(c.is_some()),
			TreeNode::Leaf { .. } => panic!("root should be internal"),
		}
	}
}
