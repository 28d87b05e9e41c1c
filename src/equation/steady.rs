//! Steady matrix equation `A x = b`.

use std::rc::Rc;

use crate::equation::{assign_start_cols, gather_fields, store_fields};
use crate::error::{Error, Result};
use crate::field::VariableField;
use crate::linalg::{DirectSolver, Solver, SolverStats, SparseMatrix};
use crate::physics::SteadyPhysics;

/// Owns the assembled steady system and drives one linearised solve per
/// outer iteration.
///
/// Construction assigns each physics its row block (prefix sums of the
/// variable-field widths) and each unique variable field its column
/// block, in first-encountered order. The equation holds shared handles
/// to the physics and fields; meshes, boundaries, and coefficients stay
/// owned by the client scope.
pub struct SteadyEquation {
    physics: Vec<Rc<dyn SteadyPhysics>>,
    variable_fields: Vec<Rc<VariableField>>,
    start_cols: Vec<usize>,
    num_dof: usize,
    a: SparseMatrix,
    b: Vec<f64>,
    x: Vec<f64>,
    solver: Box<dyn Solver>,
}

impl SteadyEquation {
    /// Concatenate the physics into one square system.
    ///
    /// The unknown vector starts at zero; variables keep their
    /// client-set values until the first `store_solution`.
    pub fn new(physics: Vec<Rc<dyn SteadyPhysics>>) -> Result<Self> {
        let mut start_row = 0;
        let mut per_physics_fields = Vec::with_capacity(physics.len());
        for p in &physics {
            p.set_start_row(start_row);
            let fields = p.variable_fields();
            start_row += fields.iter().map(|f| f.num_point_field()).sum::<usize>();
            per_physics_fields.push(fields);
        }
        let num_rows = start_row;

        let (variable_fields, start_cols, num_cols) = assign_start_cols(&per_physics_fields);
        if num_rows != num_cols {
            return Err(Error::InvalidReference(format!(
                "assembled system is not square ({} rows, {} columns); \
                 each variable field must be solved by exactly one physics",
                num_rows, num_cols
            )));
        }

        Ok(Self {
            physics,
            variable_fields,
            start_cols,
            num_dof: num_rows,
            a: SparseMatrix::zeros(num_rows, num_rows),
            b: vec![0.0; num_rows],
            x: vec![0.0; num_rows],
            solver: Box::new(DirectSolver::new()),
        })
    }

    /// Replace the linear solver backend.
    pub fn with_solver(mut self, solver: Box<dyn Solver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn num_dof(&self) -> usize {
        self.num_dof
    }

    /// Current global solution vector.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Seed the solution vector from the variables' current values
    /// (useful when the client supplied a nonzero initial guess).
    pub fn load_guess_from_variables(&mut self) {
        self.x = gather_fields(&self.variable_fields, &self.start_cols, self.num_dof);
    }

    /// Assemble and solve one linearisation of the system.
    ///
    /// The triplet storage is cleared (capacity retained) and refilled by
    /// every physics, then handed to the solver. On failure the solution
    /// vector and the variables are left exactly as they were.
    pub fn iterate_solution(&mut self) -> Result<SolverStats> {
        self.a.clear();
        self.b.iter_mut().for_each(|v| *v = 0.0);

        for p in &self.physics {
            p.matrix_fill(&mut self.a, &mut self.b, &self.x)?;
        }

        let a_csr = self.a.to_csr();
        let (x_new, stats) = self.solver.solve(&a_csr, &self.b)?;
        self.x = x_new;
        Ok(stats)
    }

    /// Transfer the solution vector into the bound variables.
    pub fn store_solution(&self) {
        store_fields(&self.variable_fields, &self.start_cols, &self.x);
    }
}
