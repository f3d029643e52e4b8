//! Build command - documents to Newick tree and analysis export

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{BuildConfig, ANALYSIS_FILE, NEWICK_FILE};
use crate::core::{Document, RankedTerm};
use crate::pipeline::{analyze, Analysis};
use crate::processing::TreeStatistics;
use crate::ui;

use super::load_documents;

/// Flag values that override the environment-derived config
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
	pub input: PathBuf,
	pub output: Option<PathBuf>,
	pub max_documents: Option<usize>,
	pub top_terms: Option<usize>,
	pub no_clamp: bool,
	pub name_internal: bool,
	pub threshold: f64,
	pub precision: usize,
	pub stopwords: Vec<String>,
}

impl BuildArgs {
	fn config(&self) -> BuildConfig {
		let mut config = BuildConfig::from_env();
		if let Some(max) = self.max_documents {
			config.max_documents = max;
		}
		if let Some(top) = self.top_terms {
			config.top_terms = Some(top);
		}
		config.clamp_negative = !self.no_clamp;
		config.name_internal_nodes = self.name_internal;
		config.cluster_threshold = self.threshold;
		config.precision = self.precision;
		config.extra_stopwords = self.stopwords.clone();
		config
	}
}

#[derive(Debug, Serialize, Deserialize)]
struct AnalysisExport {
	version: String,
	timestamp: String,
	num_documents: usize,
	newick: String,
	labels: Vec<String>,
	metadata: Vec<DocumentMeta>,
	statistics: TreeStatistics,
	clusters: Vec<ClusterInfo>,
	category_distribution: Vec<CategoryCount>,
	ranked_terms: Vec<RankedTerm>,
	degenerate_corpus: bool,
}

/// Per-document record in leaf order
#[derive(Debug, Serialize, Deserialize)]
struct DocumentMeta {
	id: String,
	label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClusterInfo {
	id: usize,
	size: usize,
	members: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CategoryCount {
	category: String,
	count: usize,
}

pub fn run(args: &BuildArgs) -> Result<()> {
	let start = Instant::now();
	let config = args.config();

	ui::debug(&format!(
		"Starting build: input={}, max_documents={}, clamp={}",
		args.input.display(),
		config.max_documents,
		config.clamp_negative
	));

	let documents = load_documents(&args.input)?;
	ui::info(&format!("Building tree from {} documents", documents.len()));
	let analysis = analyze(&documents, &config).context("Tree construction failed")?;

	if analysis.degenerate_corpus {
		ui::warn("No document contained any usable terms; all distances set to 1");
	}
	if analysis.statistics.clamped_branches > 0 {
		ui::debug(&format!(
			"Clamped {} negative branch lengths to zero",
			analysis.statistics.clamped_branches
		));
	}

	match &args.output {
		Some(dir) => write_outputs(dir, &documents, &analysis)?,
		None => println!("{}", analysis.newick),
	}

	ui::build_summary(documents.len(), analysis.ranked_terms.len(), start.elapsed().as_secs_f32());
	Ok(())
}

fn write_outputs(dir: &Path, documents: &[Document], analysis: &Analysis) -> Result<()> {
	fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

	let newick_path = dir.join(NEWICK_FILE);
	fs::write(&newick_path, format!("{}\n", analysis.newick))
		.with_context(|| format!("Failed to write {}", newick_path.display()))?;
	ui::success(&format!("Tree written to {}", ui::path_link(&newick_path, 60)));

	let export = AnalysisExport {
		version: env!("CARGO_PKG_VERSION").to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
		num_documents: documents.len(),
		newick: analysis.newick.clone(),
		labels: analysis.labels.clone(),
		metadata: documents
			.iter()
			.map(|doc| DocumentMeta {
				id: doc.id.clone(),
				label: doc.leaf_label().to_string(),
				category: doc.category.clone(),
				date: doc.date.clone(),
			})
			.collect(),
		statistics: analysis.statistics.clone(),
		clusters: analysis
			.clusters
			.iter()
			.enumerate()
			.map(|(id, members)| ClusterInfo {
				id,
				size: members.len(),
				members: members.clone(),
			})
			.collect(),
		category_distribution: analysis
			.category_distribution
			.iter()
			.map(|(category, count)| CategoryCount {
				category: category.clone(),
				count: *count,
			})
			.collect(),
		ranked_terms: analysis.ranked_terms.clone(),
		degenerate_corpus: analysis.degenerate_corpus,
	};

	let analysis_path = dir.join(ANALYSIS_FILE);
	let json = serde_json::to_string_pretty(&export)?;
	fs::write(&analysis_path, json).with_context(|| format!("Failed to write {}", analysis_path.display()))?;
	ui::success(&format!("Analysis written to {}", ui::path_link(&analysis_path, 60)));

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_override_defaults() {
		let args = BuildArgs {
			max_documents: Some(10),
			top_terms: Some(3),
			no_clamp: true,
			name_internal: true,
			threshold: 0.25,
			precision: 4,
			stopwords: vec!["reuters".to_string()],
			..BuildArgs::default()
		};
		let config = args.config();
		assert_eq!(config.max_documents, 10);
		assert_eq!(config.top_terms, Some(3));
		assert!(!config.clamp_negative);
		assert!(config.name_internal_nodes);
		assert_eq!(config.cluster_threshold, 0.25);
		assert_eq!(config.precision, 4);
		assert_eq!(config.extra_stopwords, vec!["reuters"]);
	}

	#[test]
	fn writes_tree_and_analysis() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("docs.json");
		fs::write(
			&input,
			r#"[
				{"id": "1", "label": "A", "text": "the cat sat", "category": "PETS", "date": "2022-09-23"},
				{"id": "2", "label": "B", "text": "the dog sat"}
			]"#,
		)
		.unwrap();

		let out = dir.path().join("out");
		let args = BuildArgs {
			input,
			output: Some(out.clone()),
			threshold: 0.5,
			precision: 6,
			..BuildArgs::default()
		};
		run(&args).unwrap();

		let newick = fs::read_to_string(out.join(NEWICK_FILE)).unwrap();
		assert_eq!(newick.trim(), "(A:0.25,B:0.25);");

		let export: AnalysisExport =
			serde_json::from_str(&fs::read_to_string(out.join(ANALYSIS_FILE)).unwrap()).unwrap();
		assert_eq!(export.labels, vec!["A", "B"]);
		assert_eq!(export.num_documents, 2);
		assert_eq!(export.metadata.len(), 2);
		assert_eq!(export.metadata[0].id, "1");
		assert_eq!(export.metadata[0].category.as_deref(), Some("PETS"));
		assert_eq!(export.metadata[0].date.as_deref(), Some("2022-09-23"));
		assert_eq!(export.metadata[1].label, "B");
		assert_eq!(export.metadata[1].date, None);
		assert_eq!(export.statistics.num_tips, 2);
		assert_eq!(export.clusters.len(), 1);
		assert_eq!(export.ranked_terms[0].term, "sat");
		assert!(!export.timestamp.is_empty());
	}
}
