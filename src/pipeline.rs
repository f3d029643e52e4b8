//! Document corpus to Newick tree

use crate::config::BuildConfig;
use crate::core::{CoreError, CoreResult, DistanceMatrix, Document, RankedTerm, Tree};
use crate::processing::{
	aggregate_terms, build_distance_matrix, category_distribution, find_clusters,
	name_internal_nodes, NeighborJoining, NewickWriter, TreeStatistics, Vectorizer,
};
use crate::ui;

/// Result of the core contract
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBuild {
	pub newick: String,
	pub ranked_terms: Vec<RankedTerm>,
}

/// Everything produced by one build
#[derive(Debug, Clone)]
pub struct Analysis {
	pub tree: Tree,
	pub labels: Vec<String>,
	pub newick: String,
	pub ranked_terms: Vec<RankedTerm>,
	pub statistics: TreeStatistics,
	pub clusters: Vec<Vec<String>>,
	pub category_distribution: Vec<(String, usize)>,
	/// No document had any extractable term; every pair sits at distance 1
	pub degenerate_corpus: bool,
}

impl From<Analysis> for TreeBuild {
	fn from(analysis: Analysis) -> Self {
		Self {
			newick: analysis.newick,
			ranked_terms: analysis.ranked_terms,
		}
	}
}

/// Builds the similarity tree and ranked terms for `documents`
pub fn build_tree(documents: &[Document], config: &BuildConfig) -> CoreResult<TreeBuild> {
	analyze(documents, config).map(TreeBuild::from)
}

pub fn analyze(documents: &[Document], config: &BuildConfig) -> CoreResult<Analysis> {
	check_input(documents, config)?;

	let n = documents.len();
	ui::debug(&format!("Vectorizing {} documents", n));

	let vectorizer = Vectorizer::with_extra_stopwords(&config.extra_stopwords);
	let vectors = vectorizer.vectorize_all(documents);

	let tokens: u64 = vectors.iter().map(|v| v.total()).sum();
	ui::debug(&format!("Extracted {} tokens", tokens));

	let degenerate_corpus = tokens == 0;
	let matrix = if degenerate_corpus {
		ui::debug("No extractable terms in any document, using uniform distances");
		DistanceMatrix::uniform(n, 1.0)
	} else {
		build_distance_matrix(&vectors)
	};

	let labels: Vec<String> = documents.iter().map(|d| d.leaf_label().to_string()).collect();
	let joined = NeighborJoining::new(config.nj_options()).build(&matrix, &labels)?;
	let mut tree = joined.tree;

	if config.name_internal_nodes {
		let categories: Vec<Option<String>> = documents.iter().map(|d| d.category.clone()).collect();
		let named = name_internal_nodes(&mut tree, &categories);
		ui::debug(&format!("Named {} internal nodes", named));
	}

	let writer = NewickWriter {
		precision: config.precision,
		include_internal_names: config.name_internal_nodes,
	};
	let newick = writer.write(&tree);

	let ranked_terms = aggregate_terms(&vectors, config.top_terms);
	let statistics = TreeStatistics::compute(&tree, joined.clamped);
	let clusters = find_clusters(&tree, config.cluster_threshold);

	ui::debug(&format!(
		"Tree: {} tips, {} internal nodes, {} clusters at threshold {}",
		statistics.num_tips,
		statistics.num_internal_nodes,
		clusters.len(),
		config.cluster_threshold
	));

	Ok(Analysis {
		tree,
		labels,
		newick,
		ranked_terms,
		statistics,
		clusters,
		category_distribution: category_distribution(documents),
		degenerate_corpus,
	})
}

fn check_input(documents: &[Document], config: &BuildConfig) -> CoreResult<()> {
	if documents.is_empty() {
		return Err(CoreError::EmptyInput);
	}
	if documents.len() > config.max_documents {
		return Err(CoreError::TooManyDocuments {
			count: documents.len(),
			max: config.max_documents,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn docs(items: &[(&str, &str)]) -> Vec<Document> {
		items
			.iter()
			.map(|(label, text)| Document::new(*label, *label, *text))
			.collect()
	}

	#[test]
	fn single_document() {
		let out = build_tree(&docs(&[("d1", "lonely words")]), &BuildConfig::default()).unwrap();
		assert_eq!(out.newick, "d1:0.0;");
	}

	#[test]
	fn two_documents_split_distance() {
		// cos = 1/2 so d = 0.5
		let out = build_tree(
			&docs(&[("A", "the cat sat"), ("B", "the dog sat")]),
			&BuildConfig::default(),
		)
		.unwrap();
		assert_eq!(out.newick, "(A:0.25,B:0.25);");
	}

	#[test]
	fn quoted_labels_stay_balanced() {
		let out = build_tree(
			&docs(&[("Don't", "the cat sat"), ("b", "the dog sat")]),
			&BuildConfig::default(),
		)
		.unwrap();
		assert_eq!(out.newick, "(Don_t:0.25,b:0.25);");
	}

	#[test]
	fn rejects_empty_and_oversized_input() {
		let config = BuildConfig {
			max_documents: 2,
			..BuildConfig::default()
		};
		assert_eq!(build_tree(&[], &config), Err(CoreError::EmptyInput));

		let err = build_tree(&docs(&[("a", "x"), ("b", "y"), ("c", "z")]), &config).unwrap_err();
		assert_eq!(err, CoreError::TooManyDocuments { count: 3, max: 2 });
		assert!(err.is_input_error());
	}

	#[test]
	fn degenerate_corpus_falls_back_to_star() {
		let analysis = analyze(
			&docs(&[("a", "the"), ("b", "42"), ("c", ""), ("d", "and or")]),
			&BuildConfig::default(),
		)
		.unwrap();
		assert!(analysis.degenerate_corpus);
		assert!(analysis.ranked_terms.is_empty());
		assert_eq!(analysis.statistics.num_tips, 4);
		assert_eq!(analysis.statistics.clamped_branches, 0);
	}

	#[test]
	fn named_internal_nodes_appear_in_newick() {
		let documents = vec![
			Document::new("1", "s1", "football match goal").with_category("SPORTS"),
			Document::new("2", "s2", "football league goal").with_category("SPORTS"),
			Document::new("3", "p1", "election vote senate").with_category("POLITICS"),
			Document::new("4", "p2", "election campaign rally").with_category("POLITICS"),
			Document::new("5", "f1", "recipe baking bread").with_category("FOOD"),
		];
		let config = BuildConfig {
			name_internal_nodes: true,
			..BuildConfig::default()
		};
		let analysis = analyze(&documents, &config).unwrap();
		assert!(analysis.newick.contains("SPORTS_cluster"));
		assert!(analysis.newick.ends_with(';'));
		assert_eq!(
			analysis.category_distribution,
			vec![
				("SPORTS".to_string(), 2),
				("POLITICS".to_string(), 2),
				("FOOD".to_string(), 1)
			]
		);
	}
}
