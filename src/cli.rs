use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_CLUSTER_THRESHOLD, DEFAULT_PRECISION};

fn parse_threshold(s: &str) -> Result<f64, String> {
	let val: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !val.is_finite() || val < 0.0 {
		Err(format!("threshold must be a non-negative number, got {}", val))
	} else {
		Ok(val)
	}
}

fn parse_precision(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid integer", s))?;
	if (1..=17).contains(&val) {
		Ok(val)
	} else {
		Err(format!("precision must be between 1 and 17, got {}", val))
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

#[derive(Parser, Debug)]
#[command(
	name = "phylotext",
	author,
	version,
	about = "Text similarity trees via neighbor-joining",
	styles = styles(),
	after_help = format!(
		"{title}
  {bin} {build}  {build_args}         {build_desc}
  {bin} {build}  {build_out_args}  {build_out_desc}
  {bin} {terms}  {terms_args}      {terms_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "phylotext".bright_blue(),
		build = "build".yellow(),
		build_args = "-i docs.json",
		build_desc = "Print the Newick tree".dimmed(),
		build_out_args = "-i docs.json -o out/",
		build_out_desc = "Write tree.nwk and analysis.json".dimmed(),
		terms = "terms".yellow(),
		terms_args = "-i docs.json -n 20",
		terms_desc = "Top 20 terms across the corpus".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build a neighbor-joining tree from a JSON array of documents
	Build {
		/// Documents file ("-" reads stdin)
		#[arg(short = 'i', long = "input", value_name = "FILE")]
		input: PathBuf,

		/// Directory for tree.nwk and analysis.json (prints Newick to stdout when omitted)
		#[arg(short = 'o', long = "output", value_name = "DIR")]
		output: Option<PathBuf>,

		/// Reject inputs with more documents than this (overrides PHYLOTEXT_MAX_DOCUMENTS)
		#[arg(long = "max-docs")]
		max_documents: Option<usize>,

		/// Number of ranked terms to keep (overrides PHYLOTEXT_TOP_TERMS)
		#[arg(short = 'n', long = "top-terms")]
		top_terms: Option<usize>,

		/// Keep negative branch lengths instead of clamping them to zero
		#[arg(long = "no-clamp")]
		no_clamp: bool,

		/// Name internal nodes after the dominant document category
		#[arg(long = "name-internal")]
		name_internal: bool,

		/// Maximum branch length joining leaves into one cluster
		#[arg(short = 't', long = "threshold", default_value_t = DEFAULT_CLUSTER_THRESHOLD, value_parser = parse_threshold)]
		threshold: f64,

		/// Significant digits for branch lengths
		#[arg(short = 'p', long = "precision", default_value_t = DEFAULT_PRECISION, value_parser = parse_precision)]
		precision: usize,

		/// Additional stopwords (comma-separated)
		#[arg(long = "stopword", value_delimiter = ',')]
		stopwords: Vec<String>,
	},

	/// Rank terms across all documents
	Terms {
		/// Documents file ("-" reads stdin)
		#[arg(short = 'i', long = "input", value_name = "FILE")]
		input: PathBuf,

		/// Number of terms to show
		#[arg(short = 'n', long = "limit", default_value_t = 20)]
		limit: usize,

		/// Print JSON instead of a table
		#[arg(long = "json")]
		json: bool,

		/// Additional stopwords (comma-separated)
		#[arg(long = "stopword", value_delimiter = ',')]
		stopwords: Vec<String>,
	},
}
