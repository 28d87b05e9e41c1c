use sprs::CsMat;

use crate::error::Result;

/// Statistics from solver execution
#[derive(Debug, Clone)]
pub struct SolverStats {
    /// Number of iterations (0 for direct solvers)
    pub iterations: usize,

    /// Final residual norm ||r|| = ||b - Ax||
    pub residual_norm: f64,

    /// Relative residual ||r|| / ||b||
    pub relative_residual: f64,

    /// Whether the solver considers the solution converged
    pub converged: bool,

    /// Solve time in seconds
    pub solve_time: f64,
}

impl SolverStats {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            residual_norm: 0.0,
            relative_residual: 0.0,
            converged: false,
            solve_time: 0.0,
        }
    }
}

impl Default for SolverStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear system solver
///
/// Solves Ax = b for x. The matrix equations consume the solver through
/// this trait only, so a client can swap in a different backend.
pub trait Solver {
    /// Solve the linear system Ax = b
    ///
    /// # Arguments
    /// * `a` - System matrix (n x n, CSR)
    /// * `b` - Right-hand side vector (n)
    ///
    /// # Returns
    /// Solution vector x and solver statistics, or `NumericFailure` when
    /// the system cannot be solved.
    fn solve(&mut self, a: &CsMat<f64>, b: &[f64]) -> Result<(Vec<f64>, SolverStats)>;

    /// Get solver name
    fn name(&self) -> &str;
}

/// Helper functions for solver validation
pub struct SolverUtils;

impl SolverUtils {
    /// Compute the matrix-vector product Ax as a dense vector
    pub fn mat_vec(a: &CsMat<f64>, x: &[f64]) -> Vec<f64> {
        let mut ax = vec![0.0; a.rows()];
        for (row_idx, row) in a.outer_iterator().enumerate() {
            let mut sum = 0.0;
            for (col_idx, &val) in row.iter() {
                sum += val * x[col_idx];
            }
            ax[row_idx] = sum;
        }
        ax
    }

    /// Compute residual r = b - Ax
    pub fn compute_residual(a: &CsMat<f64>, x: &[f64], b: &[f64]) -> Vec<f64> {
        let ax = Self::mat_vec(a, x);
        b.iter()
            .zip(ax.iter())
            .map(|(&bi, &axi)| bi - axi)
            .collect()
    }

    /// Compute L2 norm of a vector
    pub fn norm(v: &[f64]) -> f64 {
        v.iter().map(|&x| x * x).sum::<f64>().sqrt()
    }

    /// Compute residual norm ||b - Ax||
    pub fn residual_norm(a: &CsMat<f64>, x: &[f64], b: &[f64]) -> f64 {
        let r = Self::compute_residual(a, x, b);
        Self::norm(&r)
    }

    /// Compute relative residual ||b - Ax|| / ||b||
    pub fn relative_residual(a: &CsMat<f64>, x: &[f64], b: &[f64]) -> f64 {
        let r_norm = Self::residual_norm(a, x, b);
        let b_norm = Self::norm(b);

        if b_norm < 1e-14 {
            r_norm
        } else {
            r_norm / b_norm
        }
    }
}
