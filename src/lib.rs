//! # Phylotext Library
//!
//! Builds a neighbor-joining tree over a corpus of text documents.
//! Documents become sparse term vectors, pairwise cosine distances feed
//! the joining algorithm, and the result is written as Newick together
//! with a ranked list of the corpus terms.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod processing;
pub mod ui;

pub use config::BuildConfig;
pub use core::{CoreError, CoreResult, DistanceMatrix, Document, RankedTerm, TermVector, Tree};
pub use pipeline::{analyze, build_tree, Analysis, TreeBuild};
