//! Unified logging system
//!
//! Everything goes to stderr; stdout is reserved for Newick and JSON output.

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	eprintln!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	eprintln!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	eprintln!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		eprintln!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	eprintln!("\n{}", text.bright_blue().bold());
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &std::path::Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or("unknown");

	let display_name = if filename.chars().count() > max_len && max_len > 6 {
		let head: String = filename.chars().take(max_len / 2).collect();
		let tail_len = max_len / 2 - 3;
		let tail: String = filename
			.chars()
			.skip(filename.chars().count() - tail_len)
			.collect();
		format!("{}...{}", head, tail)
	} else {
		filename.to_string()
	};

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, display_name)
}

/// Summary line for one finished build
pub fn build_summary(documents: usize, terms: usize, duration_secs: f32) {
	header("Summary");
	eprintln!("  {} {}", "Documents:".bright_blue(), documents);
	eprintln!("  {} {}", "Ranked terms:".bright_blue(), terms);
	eprintln!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
}
