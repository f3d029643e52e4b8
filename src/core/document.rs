//! Input documents

use serde::{Deserialize, Serialize};

/// A single text document, already mapped onto the core's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

impl Document {
	pub fn new(id: impl Into<String>, label: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			text: text.into(),
			date: None,
			category: None,
		}
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	/// Label used for the tree leaf (falls back to the id when blank)
	pub fn leaf_label(&self) -> &str {
		if self.label.trim().is_empty() {
			&self.id
		} else {
			&self.label
		}
	}
}
