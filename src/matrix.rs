/*
 * Interaction Matrix Module
 *
 * This module defines the square table of signed coefficients that scales the
 * attraction (positive) or repulsion (negative) a particle of one type feels
 * towards a particle of another type. The table does not need to be symmetric:
 * entry (a, b) is what a type-a particle uses when evaluating a type-b neighbor.
 *
 * The matrix is stored row-major in a single vector so a whole-matrix read is
 * one contiguous slice, and edits go through set/replace operations only.
 */

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct InteractionMatrix {
    size: usize,
    values: Vec<f32>,
}

impl InteractionMatrix {
    // All-zero matrix (no mid-range interaction at all)
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    // Matrix with every coefficient drawn uniformly from [-1, 1)
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut matrix = Self::zeros(size);
        matrix.randomize(rng);
        matrix
    }

    // Build from explicit rows; every row must have as many entries as there are rows
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, SimulationError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(SimulationError::NonSquareMatrix {
                    rows: size,
                    row,
                    len: entries.len(),
                });
            }
            values.extend(entries);
        }

        Ok(Self { size, values })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    // Coefficient used when a type-`a` particle evaluates a type-`b` particle.
    // Callers index with types already validated against the size.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> f32 {
        self.values[a * self.size + b]
    }

    // Checked lookup
    pub fn try_get(&self, a: usize, b: usize) -> Option<f32> {
        if a < self.size && b < self.size {
            Some(self.get(a, b))
        } else {
            None
        }
    }

    // Edit a single cell
    pub fn set(&mut self, a: usize, b: usize, value: f32) -> Result<(), SimulationError> {
        if a >= self.size || b >= self.size {
            return Err(SimulationError::CellOutOfRange {
                row: a,
                col: b,
                size: self.size,
            });
        }
        self.values[a * self.size + b] = value;
        Ok(())
    }

    // Re-seed every coefficient uniformly from [-1, 1)
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for value in &mut self.values {
            *value = rng.gen_range(-1.0..1.0);
        }
    }

    // Row `a` as a slice (all coefficients a type-`a` particle uses)
    pub fn row(&self, a: usize) -> &[f32] {
        &self.values[a * self.size..(a + 1) * self.size]
    }

    pub fn rows(&self) -> Vec<Vec<f32>> {
        (0..self.size).map(|a| self.row(a).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f32>>> for InteractionMatrix {
    type Error = SimulationError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<InteractionMatrix> for Vec<Vec<f32>> {
    fn from(matrix: InteractionMatrix) -> Self {
        matrix.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn asymmetric_entries_are_kept_apart() {
        let mut matrix = InteractionMatrix::zeros(3);
        matrix.set(0, 1, 0.5).unwrap();
        matrix.set(1, 0, -0.25).unwrap();

        assert_eq!(matrix.get(0, 1), 0.5);
        assert_eq!(matrix.get(1, 0), -0.25);
        assert_eq!(matrix.get(2, 2), 0.0);
    }

    #[test]
    fn set_outside_the_matrix_is_rejected() {
        let mut matrix = InteractionMatrix::zeros(2);
        assert_eq!(
            matrix.set(2, 0, 1.0),
            Err(SimulationError::CellOutOfRange { row: 2, col: 0, size: 2 })
        );
        assert_eq!(matrix.try_get(0, 5), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = InteractionMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3]]);
        assert_eq!(
            result,
            Err(SimulationError::NonSquareMatrix { rows: 2, row: 1, len: 1 })
        );
    }

    #[test]
    fn random_values_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let matrix = InteractionMatrix::random(6, &mut rng);

        assert_eq!(matrix.rows().len(), 6);
        for a in 0..6 {
            for &value in matrix.row(a) {
                assert!((-1.0..1.0).contains(&value));
            }
        }
    }

    #[test]
    fn json_form_is_a_list_of_rows() {
        let matrix = InteractionMatrix::from_rows(vec![vec![1.0, -1.0], vec![0.5, 0.0]]).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, "[[1.0,-1.0],[0.5,0.0]]");

        let ragged: Result<InteractionMatrix, _> = serde_json::from_str("[[1.0],[0.5,0.0]]");
        assert!(ragged.is_err());
    }
}
