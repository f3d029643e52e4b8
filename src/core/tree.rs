//! Arena-backed unrooted binary tree
//!
//! Nodes live in a flat `Vec` and refer to each other by `NodeId`, so the
//! agglomeration step never has to juggle owning pointers. The root is only
//! a serialization anchor: for three or more leaves it is the trifurcating
//! node created by the final neighbor-joining step.

use super::error::{CoreError, CoreResult};
use super::matrix::DistanceMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Edge from a parent to one of its children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
	pub child: NodeId,
	pub length: f64,
}

impl Branch {
	pub fn new(child: NodeId, length: f64) -> Self {
		Self { child, length }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
	/// `index` is the position of the document in the input order
	Leaf { index: usize, label: String },
	/// `c` is only set on the trifurcating root
	Internal { a: Branch, b: Branch, c: Option<Branch> },
}

impl TreeNode {
	pub fn is_leaf(&self) -> bool {
		matches!(self, TreeNode::Leaf { .. })
	}

	pub fn branches(&self) -> impl Iterator<Item = Branch> {
		let slots = match self {
			TreeNode::Leaf { .. } => [None, None, None],
			TreeNode::Internal { a, b, c } => [Some(*a), Some(*b), *c],
		};
		slots.into_iter().flatten()
	}
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
	node: TreeNode,
	parent: Option<NodeId>,
	name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
	slots: Vec<Slot>,
	root: Option<NodeId>,
	leaf_count: usize,
}

impl Tree {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(leaves: usize) -> Self {
		Self {
			slots: Vec::with_capacity(2 * leaves),
			root: None,
			leaf_count: 0,
		}
	}

	pub fn add_leaf(&mut self, index: usize, label: impl Into<String>) -> NodeId {
		self.leaf_count += 1;
		self.push(TreeNode::Leaf {
			index,
			label: label.into(),
		})
	}

	/// Creates an internal node over two (or, for the root, three) children
	pub fn add_internal(&mut self, a: Branch, b: Branch, c: Option<Branch>) -> NodeId {
		let id = self.push(TreeNode::Internal { a, b, c });
		for branch in [Some(a), Some(b), c].into_iter().flatten() {
			self.slots[branch.child.0].parent = Some(id);
		}
		id
	}

	fn push(&mut self, node: TreeNode) -> NodeId {
		let id = NodeId(self.slots.len());
		self.slots.push(Slot {
			node,
			parent: None,
			name: None,
		});
		id
	}

	pub fn set_root(&mut self, id: NodeId) {
		self.root = Some(id);
	}

	pub fn root(&self) -> Option<NodeId> {
		self.root
	}

	pub fn node(&self, id: NodeId) -> &TreeNode {
		&self.slots[id.0].node
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.slots[id.0].parent
	}

	pub fn name(&self, id: NodeId) -> Option<&str> {
		self.slots[id.0].name.as_deref()
	}

	pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
		self.slots[id.0].name = Some(name.into());
	}

	/// Total number of nodes in the arena
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn leaf_count(&self) -> usize {
		self.leaf_count
	}

	pub fn internal_count(&self) -> usize {
		self.slots.len() - self.leaf_count
	}

	pub fn edge_count(&self) -> usize {
		self.slots.iter().map(|s| s.node.branches().count()).sum()
	}

	/// All node ids in creation order
	pub fn ids(&self) -> impl Iterator<Item = NodeId> {
		(0..self.slots.len()).map(NodeId)
	}

	/// Leaf labels ordered by input position
	pub fn leaf_labels(&self) -> Vec<String> {
		let mut leaves: Vec<(usize, &str)> = self
			.slots
			.iter()
			.filter_map(|s| match &s.node {
				TreeNode::Leaf { index, label } => Some((*index, label.as_str())),
				TreeNode::Internal { .. } => None,
			})
			.collect();
		leaves.sort_by_key(|(index, _)| *index);
		leaves.into_iter().map(|(_, label)| label.to_string()).collect()
	}

	pub fn total_length(&self) -> f64 {
		self.slots
			.iter()
			.flat_map(|s| s.node.branches())
			.map(|b| b.length)
			.sum()
	}

	/// Nodes reachable from the root, children before parents
	pub fn postorder(&self) -> Vec<NodeId> {
		let mut order = Vec::with_capacity(self.slots.len());
		let Some(root) = self.root else {
			return order;
		};

		let mut stack = vec![(root, false)];
		while let Some((id, visited)) = stack.pop() {
			if visited {
				order.push(id);
				continue;
			}
			stack.push((id, true));
			let children: Vec<Branch> = self.node(id).branches().collect();
			for branch in children.into_iter().rev() {
				stack.push((branch.child, false));
			}
		}
		order
	}

	/// Input indices of the leaves beneath `id`, ascending
	pub fn leaves_under(&self, id: NodeId) -> Vec<usize> {
		let mut found = Vec::new();
		let mut stack = vec![id];
		while let Some(current) = stack.pop() {
			match self.node(current) {
				TreeNode::Leaf { index, .. } => found.push(*index),
				node => stack.extend(node.branches().map(|b| b.child)),
			}
		}
		found.sort_unstable();
		found
	}

	/// Every edge as the leaf set on the side that excludes leaf 0
	pub fn bipartitions(&self) -> Vec<(Vec<usize>, f64)> {
		let n = self.leaf_count;
		let mut splits = Vec::with_capacity(self.edge_count());

		for id in self.ids() {
			for branch in self.node(id).branches() {
				let below = self.leaves_under(branch.child);
				let side = if below.first() == Some(&0) {
					let mut inside = vec![false; n];
					for &leaf in &below {
						inside[leaf] = true;
					}
					(0..n).filter(|&leaf| !inside[leaf]).collect()
				} else {
					below
				};
				splits.push((side, branch.length));
			}
		}

		splits.sort_by(|a, b| a.0.cmp(&b.0));
		splits
	}

	/// Path-length distances between every pair of leaves
	pub fn leaf_distances(&self) -> DistanceMatrix {
		let n = self.leaf_count;
		let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.slots.len()];
		let mut leaf_nodes = vec![0usize; n];

		for (pos, slot) in self.slots.iter().enumerate() {
			if let TreeNode::Leaf { index, .. } = &slot.node {
				leaf_nodes[*index] = pos;
			}
			for branch in slot.node.branches() {
				adjacency[pos].push((branch.child.0, branch.length));
				adjacency[branch.child.0].push((pos, branch.length));
			}
		}

		let mut matrix = DistanceMatrix::zeros(n);
		let mut dist = vec![f64::NAN; self.slots.len()];

		for (from_index, &from_node) in leaf_nodes.iter().enumerate() {
			dist.iter_mut().for_each(|d| *d = f64::NAN);
			dist[from_node] = 0.0;
			let mut stack = vec![from_node];
			while let Some(current) = stack.pop() {
				for &(next, length) in &adjacency[current] {
					if dist[next].is_nan() {
						dist[next] = dist[current] + length;
						stack.push(next);
					}
				}
			}
			for (to_index, &to_node) in leaf_nodes.iter().enumerate().skip(from_index + 1) {
				matrix.set(from_index, to_index, dist[to_node]);
			}
		}

		matrix
	}

	/// Verifies the node and edge counts of an unrooted binary tree over `n` leaves
	pub fn check_shape(&self, n: usize) -> CoreResult<()> {
		let expected_internal = match n {
			0 => 0,
			1 => 0,
			2 => 1,
			_ => n - 2,
		};
		let expected_edges = match n {
			0 | 1 => 0,
			2 => 2,
			_ => 2 * n - 3,
		};

		if self.leaf_count != n {
			return Err(CoreError::InvariantViolation(format!(
				"tree has {} leaves, expected {}",
				self.leaf_count, n
			)));
		}
		if self.internal_count() != expected_internal {
			return Err(CoreError::InvariantViolation(format!(
				"tree has {} internal nodes, expected {}",
				self.internal_count(),
				expected_internal
			)));
		}
		if self.edge_count() != expected_edges {
			return Err(CoreError::InvariantViolation(format!(
				"tree has {} edges, expected {}",
				self.edge_count(),
				expected_edges
			)));
		}
		if let Some(orphan) = self.ids().find(|&id| Some(id) != self.root && self.parent(id).is_none()) {
			return Err(CoreError::InvariantViolation(format!("node {} has no parent", orphan.0)));
		}
		if n > 0 && self.postorder().len() != self.slots.len() {
			return Err(CoreError::InvariantViolation(
				"not every node is reachable from the root".to_string(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// ((0,1),2,3) with distinct lengths
	fn quartet() -> Tree {
		let mut tree = Tree::new();
		let l0 = tree.add_leaf(0, "a");
		let l1 = tree.add_leaf(1, "b");
		let l2 = tree.add_leaf(2, "c");
		let l3 = tree.add_leaf(3, "d");
		let u = tree.add_internal(Branch::new(l0, 1.0), Branch::new(l1, 2.0), None);
		let root = tree.add_internal(
			Branch::new(u, 0.5),
			Branch::new(l2, 3.0),
			Some(Branch::new(l3, 4.0)),
		);
		tree.set_root(root);
		tree
	}

	#[test]
	fn counts_and_shape() {
		let tree = quartet();
		assert_eq!(tree.leaf_count(), 4);
		assert_eq!(tree.internal_count(), 2);
		assert_eq!(tree.edge_count(), 5);
		assert!(tree.check_shape(4).is_ok());
		assert!(tree.check_shape(5).is_err());
		assert_eq!(tree.total_length(), 10.5);
	}

	#[test]
	fn parents_are_linked() {
		let tree = quartet();
		assert_eq!(tree.parent(NodeId(0)), Some(NodeId(4)));
		assert_eq!(tree.parent(NodeId(4)), Some(NodeId(5)));
		assert_eq!(tree.parent(NodeId(5)), None);
	}

	#[test]
	fn detached_root_fails_shape_check() {
		let mut tree = Tree::new();
		let a = tree.add_leaf(0, "a");
		let b = tree.add_leaf(1, "b");
		let c = tree.add_leaf(2, "c");
		tree.add_internal(Branch::new(a, 1.0), Branch::new(b, 1.0), Some(Branch::new(c, 1.0)));
		tree.set_root(a);

		let err = tree.check_shape(3).unwrap_err();
		assert_eq!(err, CoreError::InvariantViolation("node 3 has no parent".to_string()));
	}

	#[test]
	fn postorder_visits_children_first() {
		let tree = quartet();
		let order = tree.postorder();
		assert_eq!(order.len(), 6);
		assert_eq!(order.last(), Some(&NodeId(5)));
		let pos = |id: usize| order.iter().position(|n| n.0 == id).unwrap();
		assert!(pos(0) < pos(4));
		assert!(pos(1) < pos(4));
	}

	#[test]
	fn patristic_distances_follow_paths() {
		let m = quartet().leaf_distances();
		assert_eq!(m.get(0, 1), 3.0);
		assert_eq!(m.get(0, 2), 1.0 + 0.5 + 3.0);
		assert_eq!(m.get(2, 3), 7.0);
		assert_eq!(m.get(3, 1), 2.0 + 0.5 + 4.0);
	}

	#[test]
	fn bipartitions_exclude_leaf_zero() {
		let splits = quartet().bipartitions();
		assert_eq!(splits.len(), 5);
		assert!(splits.iter().all(|(side, _)| !side.contains(&0)));
		let internal = splits.iter().find(|(side, _)| side == &vec![2, 3]).unwrap();
		assert_eq!(internal.1, 0.5);
	}

	#[test]
	fn leaf_labels_in_input_order() {
		assert_eq!(quartet().leaf_labels(), vec!["a", "b", "c", "d"]);
		assert_eq!(quartet().leaves_under(NodeId(4)), vec![0, 1]);
	}
}
