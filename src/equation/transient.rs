//! Transient matrix equation `A x(t+1) = C x(t) + d`.

use std::rc::Rc;

use crate::equation::{assign_start_cols, gather_fields, store_fields};
use crate::error::{Error, Result};
use crate::field::VariableField;
use crate::linalg::{DirectSolver, Solver, SolverStats, SolverUtils, SparseMatrix};
use crate::physics::TransientPhysics;

/// Owns the assembled transient system and advances it one backward-Euler
/// step per `iterate_solution` call.
///
/// The time-step history `x(t)` is seeded from the variables' client-set
/// values at construction, so the variables' initial state is the initial
/// condition of the march.
pub struct TransientEquation {
    physics: Vec<Rc<dyn TransientPhysics>>,
    variable_fields: Vec<Rc<VariableField>>,
    start_cols: Vec<usize>,
    num_dof: usize,
    a: SparseMatrix,
    c: SparseMatrix,
    d: Vec<f64>,
    x: Vec<f64>,
    x_last: Vec<f64>,
    solver: Box<dyn Solver>,
}

impl TransientEquation {
    pub fn new(physics: Vec<Rc<dyn TransientPhysics>>) -> Result<Self> {
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

        let x_last = gather_fields(&variable_fields, &start_cols, num_rows);
        let x = x_last.clone();

        Ok(Self {
            physics,
            variable_fields,
            start_cols,
            num_dof: num_rows,
            a: SparseMatrix::zeros(num_rows, num_rows),
            c: SparseMatrix::zeros(num_rows, num_rows),
            d: vec![0.0; num_rows],
            x,
            x_last,
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

    /// Current global solution vector `x(t+1)`.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Previous time-step vector `x(t)`.
    pub fn x_last(&self) -> &[f64] {
        &self.x_last
    }

    /// Assemble and solve one backward-Euler step of length `dt`.
    ///
    /// On failure the solution vector, the history, and the variables are
    /// left exactly as they were.
    pub fn iterate_solution(&mut self, dt: f64) -> Result<SolverStats> {
        self.a.clear();
        self.c.clear();
        self.d.iter_mut().for_each(|v| *v = 0.0);

        for p in &self.physics {
            p.matrix_fill(&mut self.a, &mut self.c, &mut self.d, &self.x, &self.x_last, dt)?;
        }

        // rhs = C x(t) + d
        let c_csr = self.c.to_csr();
        let mut rhs = SolverUtils::mat_vec(&c_csr, &self.x_last);
        for (r, &dv) in rhs.iter_mut().zip(self.d.iter()) {
            *r += dv;
        }

        let a_csr = self.a.to_csr();
        let (x_new, stats) = self.solver.solve(&a_csr, &rhs)?;
        self.x = x_new;
        Ok(stats)
    }

    /// Transfer the solution vector into the bound variables.
    pub fn store_solution(&self) {
        store_fields(&self.variable_fields, &self.start_cols, &self.x);
    }

    /// Promote the current solution to the time-step history.
    pub fn next_timestep(&mut self) {
        self.x_last.copy_from_slice(&self.x);
    }
}
