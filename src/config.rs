//! Application configuration and constants

use crate::processing::nj::NjOptions;

// === Input Limits ===
pub const DEFAULT_MAX_DOCUMENTS: usize = 2000;

// === Output ===
pub const DEFAULT_TOP_TERMS: usize = 100;
pub const DEFAULT_PRECISION: usize = 6;
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.5;
pub const NEWICK_FILE: &str = "tree.nwk";
pub const ANALYSIS_FILE: &str = "analysis.json";

// === Neighbor Joining ===
/// Active-set size from which the Q-criterion scan runs on the rayon pool
pub const PARALLEL_SCAN_THRESHOLD: usize = 64;

// === Environment ===
pub const ENV_MAX_DOCUMENTS: &str = "PHYLOTEXT_MAX_DOCUMENTS";
pub const ENV_TOP_TERMS: &str = "PHYLOTEXT_TOP_TERMS";

/// Settings for one build call, passed explicitly into the core
#[derive(Debug, Clone)]
pub struct BuildConfig {
	/// Inputs above this count are rejected, never truncated
	pub max_documents: usize,
	/// Truncate ranked terms to this many (None keeps all)
	pub top_terms: Option<usize>,
	/// Clamp negative limb lengths to zero
	pub clamp_negative: bool,
	pub parallel_threshold: usize,
	/// Significant digits for branch lengths
	pub precision: usize,
	/// Label internal nodes by the dominant category beneath them
	pub name_internal_nodes: bool,
	pub cluster_threshold: f64,
	pub extra_stopwords: Vec<String>,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			max_documents: DEFAULT_MAX_DOCUMENTS,
			top_terms: Some(DEFAULT_TOP_TERMS),
			clamp_negative: true,
			parallel_threshold: PARALLEL_SCAN_THRESHOLD,
			precision: DEFAULT_PRECISION,
			name_internal_nodes: false,
			cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
			extra_stopwords: Vec::new(),
		}
	}
}

impl BuildConfig {
	/// Defaults with `PHYLOTEXT_*` environment overrides applied
	pub fn from_env() -> Self {
		let mut config = Self::default();

		if let Some(max) = env_usize(ENV_MAX_DOCUMENTS) {
			crate::ui::debug(&format!("Using {}={}", ENV_MAX_DOCUMENTS, max));
			config.max_documents = max;
		}

		if let Some(top) = env_usize(ENV_TOP_TERMS) {
			crate::ui::debug(&format!("Using {}={}", ENV_TOP_TERMS, top));
			config.top_terms = Some(top);
		}

		config
	}

	pub fn nj_options(&self) -> NjOptions {
		NjOptions {
			clamp_negative: self.clamp_negative,
			parallel_threshold: self.parallel_threshold,
		}
	}
}

fn env_usize(key: &str) -> Option<usize> {
	let raw = std::env::var(key).ok()?;
	match raw.trim().parse() {
		Ok(value) => Some(value),
		Err(_) => {
			crate::ui::warn(&format!("Ignoring {}: '{}' is not a number", key, raw));
			None
		}
	}
}
