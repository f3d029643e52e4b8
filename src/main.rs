//! Phylotext - text similarity trees
//!
//! Reads a JSON array of documents and builds a neighbor-joining tree
//! over their cosine distances, written as Newick.

use anyhow::Result;
use clap::Parser;

use phylotext::cli::{Cli, Command};
use phylotext::commands::{self, build::BuildArgs};
use phylotext::ui;

fn main() {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);

	if let Err(err) = run(cli.command) {
		ui::error(&format!("{:#}", err));
		std::process::exit(1);
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Build {
			input,
			output,
			max_documents,
			top_terms,
			no_clamp,
			name_internal,
			threshold,
			precision,
			stopwords,
		} => commands::build::run(&BuildArgs {
			input,
			output,
			max_documents,
			top_terms,
			no_clamp,
			name_internal,
			threshold,
			precision,
			stopwords,
		}),
		Command::Terms {
			input,
			limit,
			json,
			stopwords,
		} => commands::terms::run(&input, limit, json, &stopwords),
	}
}
