//! Text-to-tree processing stages

pub mod aggregate;
pub mod annotate;
pub mod distance;
pub mod newick;
pub mod nj;
pub mod stats;
pub mod vectorize;

pub use aggregate::aggregate_terms;
pub use annotate::name_internal_nodes;
pub use distance::{build_distance_matrix, cosine_distance, cosine_similarity};
pub use newick::{format_length, sanitize_label, NewickWriter};
pub use nj::{Join, Joined, NeighborJoining, NjOptions};
pub use stats::{category_distribution, find_clusters, TreeStatistics};
pub use vectorize::Vectorizer;
