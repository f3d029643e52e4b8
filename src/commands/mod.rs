//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod build;
pub mod terms;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::Document;

/// Reads a JSON array of documents from `path`, or stdin when it is "-"
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
	let raw = if path.as_os_str() == "-" {
		let mut buf = String::new();
		std::io::stdin()
			.read_to_string(&mut buf)
			.context("Failed to read documents from stdin")?;
		buf
	} else {
		fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
	};

	let documents: Vec<Document> = serde_json::from_str(&raw)
		.with_context(|| format!("Invalid document JSON in {}", path.display()))?;

	crate::ui::debug(&format!("Loaded {} documents from {}", documents.len(), path.display()));
	Ok(documents)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn loads_documents_with_optional_fields() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"[{{"id": "1", "label": "a", "text": "hello world", "category": "TECH"}}, {{"id": "2"}}]"#
		)
		.unwrap();

		let docs = load_documents(file.path()).unwrap();
		assert_eq!(docs.len(), 2);
		assert_eq!(docs[0].category.as_deref(), Some("TECH"));
		assert_eq!(docs[1].leaf_label(), "2");
		assert!(docs[1].text.is_empty());
	}

	#[test]
	fn rejects_malformed_json() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{{not json").unwrap();
		assert!(load_documents(file.path()).is_err());
	}
}
