pub mod boundary;
pub mod config;
pub mod driver;
pub mod equation;
pub mod error;
pub mod fem;
pub mod field;
pub mod linalg;
pub mod mesh;
pub mod physics;

pub use boundary::{BoundaryConfig, BoundaryElement, BoundaryKind, Line2Boundary};
pub use config::DriverConfig;
pub use driver::{
    steady_solve, transient_solve, SteadyConfig, SteadyStats, TimeStepStats, TransientConfig,
};
pub use equation::{SteadyEquation, TransientEquation};
pub use error::{Error, Result};
pub use fem::{GaussQuadrature, Line2Basis, Line2Integrals};
pub use field::{
    BoundaryField, IntegralField, Line2Scalar, Line2Variable, MeshField, ScalarField,
    VariableField,
};
pub use linalg::{DirectSolver, Solver, SolverStats, SolverUtils, SparseMatrix};
pub use mesh::{Line2Element, Line2Mesh, Point};
pub use physics::{
    SteadyConvectionDiffusion, SteadyDiffusion, SteadyPhysics, TransientConvectionDiffusion,
    TransientDiffusion, TransientPhysics,
};
