use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by mesh/boundary construction, assembly, and solves.
///
/// Structural problems (malformed files, bad topology, mismatched
/// references) surface when the offending component is constructed.
/// Numeric problems surface from `iterate_solution` and leave the matrix
/// equation unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file could not be interpreted (bad column count, non-numeric
    /// entry, fractional value in an integer column, bad local point id,
    /// out-of-range configuration value).
    #[error("malformed input {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    /// The same point gid appears twice in one mesh.
    #[error("duplicate point gid {0} in mesh")]
    DuplicatePointGid(usize),

    /// An element references a point gid the mesh does not contain.
    #[error("element {element_gid} references unknown point gid {point_gid}")]
    UnknownPointGid {
        element_gid: usize,
        point_gid: usize,
    },

    /// A mesh without elements cannot be assembled.
    #[error("mesh has no elements")]
    EmptyMesh,

    /// Element with coincident nodes (zero Jacobian determinant).
    #[error("element {0} is degenerate (zero jacobian determinant)")]
    DegenerateElement(usize),

    /// A boundary condition was registered with the wrong parameter count.
    #[error("boundary kind {kind} expects {expected} parameter(s), got {got}")]
    BoundaryParameterArity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    /// Cross-references between components do not line up (field covers a
    /// different mesh than the physics, unregistered boundary config,
    /// integrals not evaluated, start offsets unset).
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The linear solver failed or produced non-finite values.
    #[error("numeric failure: {0}")]
    NumericFailure(String),

    /// The outer iteration exhausted its budget without meeting tolerance.
    #[error("no convergence after {iterations} iterations (residual {residual:.3e})")]
    NonConvergence { iterations: usize, residual: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
