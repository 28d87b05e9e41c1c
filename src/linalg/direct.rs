use sprs::CsMat;
use std::time::Instant;

use super::solver::{Solver, SolverStats, SolverUtils};
use crate::error::{Error, Result};

/// Direct sparse solver using LU decomposition
///
/// Densifies the system and factorises with nalgebra's LU.
/// Good for small to medium problems; 1D meshes stay well inside that.
pub struct DirectSolver {
    /// Solver name
    name: String,
}

impl DirectSolver {
    pub fn new() -> Self {
        Self {
            name: "Direct (Dense LU)".to_string(),
        }
    }
}

impl Default for DirectSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for DirectSolver {
    fn solve(&mut self, a: &CsMat<f64>, b: &[f64]) -> Result<(Vec<f64>, SolverStats)> {
        let start = Instant::now();

        let n = b.len();

        // Convert sparse matrix to dense nalgebra matrix
        let mut a_dense = nalgebra::DMatrix::zeros(n, n);
        for (row_idx, row) in a.outer_iterator().enumerate() {
            for (col_idx, &val) in row.iter() {
                a_dense[(row_idx, col_idx)] = val;
            }
        }

        // Use nalgebra LU factorization
        let lu = a_dense.lu();

        // Convert b to DVector
        let b_vec = nalgebra::DVector::from_vec(b.to_vec());

        // Solve
        let x_vec = lu
            .solve(&b_vec)
            .ok_or_else(|| Error::NumericFailure("LU factorization found singular matrix".to_string()))?;

        let x: Vec<f64> = x_vec.iter().copied().collect();

        if x.iter().any(|v| !v.is_finite()) {
            return Err(Error::NumericFailure(
                "solution contains non-finite values".to_string(),
            ));
        }

        let solve_time = start.elapsed().as_secs_f64();

        // Compute residual
        let residual_norm = SolverUtils::residual_norm(a, &x, b);
        let relative_residual = SolverUtils::relative_residual(a, &x, b);

        let stats = SolverStats {
            iterations: 0, // Direct solver doesn't iterate
            residual_norm,
            relative_residual,
            converged: relative_residual < 1e-8,
            solve_time,
        };

        Ok((x, stats))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
