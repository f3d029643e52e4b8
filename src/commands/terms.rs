//! Terms command - rank terms across the corpus

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use colored::*;

use crate::core::RankedTerm;
use crate::processing::{aggregate_terms, Vectorizer};
use crate::ui;

use super::load_documents;

pub fn run(input: &Path, limit: usize, json: bool, stopwords: &[String]) -> Result<()> {
	let start = Instant::now();

	let documents = load_documents(input)?;
	if documents.is_empty() {
		ui::warn("No documents found in input.");
		return Ok(());
	}

	let vectorizer = Vectorizer::with_extra_stopwords(stopwords);
	let vectors = vectorizer.vectorize_all(&documents);
	let ranked = aggregate_terms(&vectors, Some(limit));

	if json {
		println!("{}", serde_json::to_string_pretty(&ranked)?);
		return Ok(());
	}

	print_terms(&ranked);

	ui::success(&format!(
		"Ranked {} terms from {} documents in {:.1}s",
		ranked.len(),
		documents.len(),
		start.elapsed().as_secs_f32()
	));
	Ok(())
}

fn print_terms(ranked: &[RankedTerm]) {
	ui::header("Top terms");

	let width = ranked.iter().map(|t| t.term.chars().count()).max().unwrap_or(0);
	for (i, term) in ranked.iter().enumerate() {
		println!(
			"{}. {:<width$}  {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			term.term.bright_white(),
			term.count.to_string().dimmed(),
			width = width
		);
	}
	println!();
}
