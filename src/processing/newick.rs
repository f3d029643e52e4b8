//! Newick serialization

use crate::config::DEFAULT_PRECISION;
use crate::core::{Branch, NodeId, Tree, TreeNode};

/// Characters with structural meaning in Newick
const RESERVED: &[char] = &['(', ')', '[', ']', ':', ';', ',', '\'', '"'];

/// Replaces reserved characters and whitespace with `_`
pub fn sanitize_label(label: &str) -> String {
	label
		.chars()
		.map(|c| if RESERVED.contains(&c) || c.is_whitespace() { '_' } else { c })
		.collect()
}

/// Rounds to `precision` significant digits, keeping at least one decimal
pub fn format_length(value: f64, precision: usize) -> String {
	if value == 0.0 {
		return "0.0".to_string();
	}
	if !value.is_finite() {
		return value.to_string();
	}

	let precision = precision.max(1) as i32;
	let magnitude = value.abs().log10().floor() as i32;
	let excess = magnitude + 1 - precision;
	let value = if excess > 0 {
		let scale = 10f64.powi(excess);
		(value / scale).round() * scale
	} else {
		value
	};
	let decimals = (precision - 1 - magnitude).max(0) as usize;
	let mut text = format!("{:.*}", decimals, value);

	if text.contains('.') {
		let trimmed = text.trim_end_matches('0').len();
		text.truncate(trimmed);
		if text.ends_with('.') {
			text.push('0');
		}
	} else {
		text.push_str(".0");
	}

	if text == "-0.0" {
		text = "0.0".to_string();
	}
	text
}

#[derive(Debug, Clone, Copy)]
pub struct NewickWriter {
	/// Significant digits for branch lengths
	pub precision: usize,
	/// Emit internal node names after their closing parenthesis
	pub include_internal_names: bool,
}

impl Default for NewickWriter {
	fn default() -> Self {
		Self {
			precision: DEFAULT_PRECISION,
			include_internal_names: true,
		}
	}
}

enum Step {
	Visit(NodeId),
	Emit(String),
}

impl NewickWriter {
	pub fn write(&self, tree: &Tree) -> String {
		let mut out = String::new();
		let Some(root) = tree.root() else {
			out.push(';');
			return out;
		};

		if let TreeNode::Leaf { label, .. } = tree.node(root) {
			out.push_str(&sanitize_label(label));
			out.push(':');
			out.push_str(&format_length(0.0, self.precision));
			out.push(';');
			return out;
		}

		let mut stack = vec![Step::Visit(root)];
		while let Some(step) = stack.pop() {
			match step {
				Step::Emit(text) => out.push_str(&text),
				Step::Visit(id) => match tree.node(id) {
					TreeNode::Leaf { label, .. } => out.push_str(&sanitize_label(label)),
					node => {
						let mut close = String::from(")");
						if self.include_internal_names {
							if let Some(name) = tree.name(id) {
								close.push_str(&sanitize_label(name));
							}
						}
						stack.push(Step::Emit(close));

						let branches: Vec<Branch> = node.branches().collect();
						for (k, branch) in branches.iter().enumerate().rev() {
							stack.push(Step::Emit(format!(
								":{}",
								format_length(branch.length, self.precision)
							)));
							stack.push(Step::Visit(branch.child));
							if k > 0 {
								stack.push(Step::Emit(",".to_string()));
							}
						}
						out.push('(');
					}
				},
			}
		}

		out.push(';');
		out
	}
}
