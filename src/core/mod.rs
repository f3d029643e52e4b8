//! Core domain types

pub mod document;
pub mod error;
pub mod matrix;
pub mod terms;
pub mod tree;

pub use document::Document;
pub use error::{CoreError, CoreResult};
pub use matrix::DistanceMatrix;
pub use terms::{RankedTerm, TermVector};
pub use tree::{Branch, NodeId, Tree, TreeNode};
