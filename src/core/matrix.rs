//! Square pairwise distance matrix

use ndarray::Array2;

use super::error::{CoreError, CoreResult};

const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Symmetric N×N distance matrix with a zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
	data: Array2<f64>,
}

impl DistanceMatrix {
	pub fn zeros(order: usize) -> Self {
		Self {
			data: Array2::zeros((order, order)),
		}
	}

	/// Every distinct pair at the same distance (star-shaped input)
	pub fn uniform(order: usize, distance: f64) -> Self {
		let mut data = Array2::from_elem((order, order), distance);
		for i in 0..order {
			data[[i, i]] = 0.0;
		}
		Self { data }
	}

	/// Builds and validates a matrix from row vectors
	pub fn from_rows(rows: Vec<Vec<f64>>) -> CoreResult<Self> {
		let order = rows.len();
		let mut data = Array2::zeros((order, order));

		for (i, row) in rows.iter().enumerate() {
			if row.len() != order {
				return Err(CoreError::InvalidMatrix(format!(
					"row {} has {} entries, expected {}",
					i,
					row.len(),
					order
				)));
			}
			for (j, &value) in row.iter().enumerate() {
				data[[i, j]] = value;
			}
		}

		let matrix = Self { data };
		matrix.validate()?;
		Ok(matrix)
	}

	pub fn order(&self) -> usize {
		self.data.nrows()
	}

	pub fn get(&self, i: usize, j: usize) -> f64 {
		self.data[[i, j]]
	}

	/// Sets both (i, j) and (j, i)
	pub fn set(&mut self, i: usize, j: usize, value: f64) {
		self.data[[i, j]] = value;
		self.data[[j, i]] = value;
	}

	pub fn row_sum(&self, i: usize) -> f64 {
		self.data.row(i).sum()
	}

	pub fn as_array(&self) -> &Array2<f64> {
		&self.data
	}

	/// Checks finiteness, non-negativity, zero diagonal and symmetry
	pub fn validate(&self) -> CoreResult<()> {
		let n = self.order();
		for i in 0..n {
			if self.data[[i, i]] != 0.0 {
				return Err(CoreError::InvalidMatrix(format!(
					"diagonal entry ({i}, {i}) is {}",
					self.data[[i, i]]
				)));
			}
			for j in 0..n {
				let value = self.data[[i, j]];
				if !value.is_finite() || value < 0.0 {
					return Err(CoreError::InvalidMatrix(format!(
						"entry ({i}, {j}) is {value}"
					)));
				}
				if (value - self.data[[j, i]]).abs() > SYMMETRY_TOLERANCE {
					return Err(CoreError::InvalidMatrix(format!(
						"not symmetric at ({i}, {j})"
					)));
				}
			}
		}
		Ok(())
	}
}
