//! Pairwise cosine distances between term vectors

use rayon::prelude::*;

use crate::core::{DistanceMatrix, TermVector};

/// Cosine similarity; 0 when either vector has no terms
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
	let norms = a.norm() * b.norm();
	if norms == 0.0 {
		return 0.0;
	}
	a.dot(b) / norms
}

/// `1 - cos`, kept inside [0, 2] against rounding
pub fn cosine_distance(a: &TermVector, b: &TermVector) -> f64 {
	(1.0 - cosine_similarity(a, b)).clamp(0.0, 2.0)
}

/// Symmetric matrix of cosine distances with a zero diagonal
pub fn build_distance_matrix(vectors: &[TermVector]) -> DistanceMatrix {
	let n = vectors.len();

	let pairs: Vec<(usize, usize)> = (0..n)
		.flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
		.collect();

	let distances: Vec<f64> = pairs
		.par_iter()
		.map(|&(i, j)| cosine_distance(&vectors[i], &vectors[j]))
		.collect();

	let mut matrix = DistanceMatrix::zeros(n);
	for (&(i, j), &d) in pairs.iter().zip(distances.iter()) {
		matrix.set(i, j, d);
	}
	matrix
}
