//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
	#[error("No documents provided")]
	EmptyInput,

	#[error("Too many documents: {count} exceeds the configured maximum of {max}")]
	TooManyDocuments { count: usize, max: usize },

	#[error("Distance matrix has order {order} but {labels} labels were given")]
	LabelMismatch { order: usize, labels: usize },

	#[error("Invalid distance matrix: {0}")]
	InvalidMatrix(String),

	#[error("Internal invariant violated: {0}")]
	InvariantViolation(String),
}

impl CoreError {
	/// True for errors caused by the caller's input rather than a defect
	pub fn is_input_error(&self) -> bool {
		!matches!(self, CoreError::InvariantViolation(_))
	}
}

pub type CoreResult<T> = Result<T, CoreError>;
