pub mod direct;
pub mod solver;
pub mod sparse;

pub use direct::DirectSolver;
pub use solver::{Solver, SolverStats, SolverUtils};
pub use sparse::SparseMatrix;
