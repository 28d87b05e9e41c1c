//! Outer iteration loops: Picard fixed-point iteration for steady
//! problems with solution-dependent coefficients, and fixed-step time
//! marching for transient problems.

use crate::equation::{SteadyEquation, TransientEquation};
use crate::error::{Error, Result};
use crate::linalg::{SolverStats, SolverUtils};

/// Configuration for the steady Picard loop
#[derive(Debug, Clone)]
pub struct SteadyConfig {
    /// Maximum number of outer iterations
    pub max_iterations: usize,

    /// Convergence tolerance on the L2 norm of x_new - x_old
    pub tolerance: f64,
}

impl Default for SteadyConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-3,
        }
    }
}

/// Statistics from the steady Picard loop
#[derive(Debug, Clone)]
pub struct SteadyStats {
    /// Number of outer iterations performed
    pub iterations: usize,

    /// Did it converge?
    pub converged: bool,

    /// Final L2 norm of x_new - x_old
    pub final_residual: f64,

    /// Linear solver stats from the last iteration
    pub last_solver_stats: SolverStats,
}

impl SteadyStats {
    /// Promote a non-converged outcome to a hard error. Non-convergence
    /// is reportable rather than fatal, so the loop itself never fails
    /// on it.
    pub fn into_result(self) -> Result<SteadyStats> {
        if self.converged {
            Ok(self)
        } else {
            Err(Error::NonConvergence {
                iterations: self.iterations,
                residual: self.final_residual,
            })
        }
    }
}

/// Drive the steady equation to a fixed point.
///
/// Each iteration calls `update_coefficients(iteration)` first; the
/// client reads its variables and refreshes whatever coefficient scalars
/// depend on them (a no-op closure makes this a plain linear solve, which
/// converges on the second iteration). Then the system is reassembled,
/// solved, and stored back, and the L2 norm of the solution change is
/// tested against the tolerance.
pub fn steady_solve<F>(
    equation: &mut SteadyEquation,
    config: &SteadyConfig,
    mut update_coefficients: F,
) -> Result<SteadyStats>
where
    F: FnMut(usize),
{
    let mut last_solver_stats = SolverStats::new();
    let mut residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        update_coefficients(iteration);

        let x_old = equation.x().to_vec();
        last_solver_stats = equation.iterate_solution()?;
        equation.store_solution();

        let delta: Vec<f64> = equation
            .x()
            .iter()
            .zip(x_old.iter())
            .map(|(new, old)| new - old)
            .collect();
        residual = SolverUtils::norm(&delta);

        if residual < config.tolerance {
            return Ok(SteadyStats {
                iterations: iteration + 1,
                converged: true,
                final_residual: residual,
                last_solver_stats,
            });
        }
    }

    Ok(SteadyStats {
        iterations: config.max_iterations,
        converged: false,
        final_residual: residual,
        last_solver_stats,
    })
}

/// Configuration for the transient time-stepping loop
#[derive(Debug, Clone)]
pub struct TransientConfig {
    /// Time step size
    pub dt: f64,

    /// Number of steps to march
    pub num_timesteps: usize,
}

/// Statistics for a single time step
#[derive(Debug, Clone)]
pub struct TimeStepStats {
    /// Simulation time after the step
    pub time: f64,
    /// Time step size used
    pub dt: f64,
    /// Linear solver residual norm for the step
    pub residual: f64,
}

/// March the transient equation through `num_timesteps` backward-Euler
/// steps.
///
/// After each step the solution is stored into the variables and
/// promoted to the history, then `on_step(timestep)` runs; clients use
/// it to write per-step output and refresh solution-dependent
/// coefficients before the next step.
pub fn transient_solve<F>(
    equation: &mut TransientEquation,
    config: &TransientConfig,
    mut on_step: F,
) -> Result<Vec<TimeStepStats>>
where
    F: FnMut(usize),
{
    if !(config.dt > 0.0) {
        return Err(Error::MalformedInput {
            path: "transient config".into(),
            reason: format!("dt must be positive, got {}", config.dt),
        });
    }

    let mut stats = Vec::with_capacity(config.num_timesteps);
    let mut time = 0.0;

    for timestep in 0..config.num_timesteps {
        let solver_stats = equation.iterate_solution(config.dt)?;
        equation.store_solution();
        equation.next_timestep();
        time += config.dt;

        stats.push(TimeStepStats {
            time,
            dt: config.dt,
            residual: solver_stats.residual_norm,
        });

        on_step(timestep);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::boundary::{BoundaryElement, BoundaryKind, Line2Boundary};
    use crate::equation::SteadyEquation;
    use crate::fem::Line2Integrals;
    use crate::field::{
        BoundaryField, IntegralField, Line2Scalar, Line2Variable, MeshField, ScalarField,
        VariableField,
    };
    use crate::mesh::{Line2Element, Line2Mesh, Point};
    use crate::physics::{SteadyDiffusion, SteadyPhysics, TransientDiffusion, TransientPhysics};

    fn linear_problem() -> SteadyEquation {
        let points = vec![
            Point { gid: 0, x: 0.0 },
            Point { gid: 1, x: 0.5 },
            Point { gid: 2, x: 1.0 },
        ];
        let elements = vec![Line2Element::new(0, 0, 1), Line2Element::new(1, 1, 2)];
        let mesh = Rc::new(Line2Mesh::new(points, elements).unwrap());

        let mut boundary = Line2Boundary::new(
            Rc::clone(&mesh),
            vec![],
            vec![
                BoundaryElement {
                    element_gid: 0,
                    local_point: Some(0),
                    config_id: 0,
                },
                BoundaryElement {
                    element_gid: 1,
                    local_point: Some(1),
                    config_id: 1,
                },
            ],
        )
        .unwrap();
        boundary
            .set_boundary_condition(0, BoundaryKind::Dirichlet, &[10.0])
            .unwrap();
        boundary
            .set_boundary_condition(1, BoundaryKind::Dirichlet, &[20.0])
            .unwrap();
        let boundary = Rc::new(boundary);

        let mut integrals = Line2Integrals::new(Rc::clone(&mesh));
        integrals.evaluate_all().unwrap();
        let integrals = Rc::new(integrals);

        let temperature = Line2Variable::new(Rc::clone(&mesh), 0.0);
        let physics: Rc<dyn SteadyPhysics> = Rc::new(
            SteadyDiffusion::new(
                MeshField::new(vec![Rc::clone(&mesh)]),
                BoundaryField::new(vec![boundary]),
                IntegralField::new(vec![integrals]),
                VariableField::new(vec![temperature]),
                ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 1.0)]),
                ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 0.0)]),
            )
            .unwrap(),
        );

        SteadyEquation::new(vec![physics]).unwrap()
    }

    #[test]
    fn test_linear_problem_converges_in_two_iterations() {
        let mut equation = linear_problem();
        let config = SteadyConfig::default();

        let stats = steady_solve(&mut equation, &config, |_| {}).unwrap();

        // first iteration jumps to the solution, second confirms it
        assert!(stats.converged);
        assert_eq!(stats.iterations, 2);
        assert!(stats.final_residual < config.tolerance);
    }

    #[test]
    fn test_non_convergence_is_reportable() {
        let mut equation = linear_problem();
        let config = SteadyConfig {
            max_iterations: 1,
            tolerance: 1e-12,
        };

        let stats = steady_solve(&mut equation, &config, |_| {}).unwrap();
        assert!(!stats.converged);

        let err = stats.into_result().unwrap_err();
        assert!(matches!(err, Error::NonConvergence { iterations: 1, .. }));
    }

    #[test]
    fn test_steady_config_default() {
        let config = SteadyConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.tolerance, 1e-3);
    }

    #[test]
    fn test_non_positive_dt_rejected() {
        let points = vec![Point { gid: 0, x: 0.0 }, Point { gid: 1, x: 1.0 }];
        let elements = vec![Line2Element::new(0, 0, 1)];
        let mesh = Rc::new(Line2Mesh::new(points, elements).unwrap());

        let boundary = Rc::new(Line2Boundary::new(Rc::clone(&mesh), vec![], vec![]).unwrap());
        let mut integrals = Line2Integrals::new(Rc::clone(&mesh));
        integrals.evaluate_all().unwrap();

        let physics: Rc<dyn TransientPhysics> = Rc::new(
            TransientDiffusion::new(
                MeshField::new(vec![Rc::clone(&mesh)]),
                BoundaryField::new(vec![boundary]),
                IntegralField::new(vec![Rc::new(integrals)]),
                VariableField::new(vec![Line2Variable::new(Rc::clone(&mesh), 0.0)]),
                ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 1.0)]),
                ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 1.0)]),
                ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 0.0)]),
            )
            .unwrap(),
        );
        let mut equation = TransientEquation::new(vec![physics]).unwrap();

        let config = TransientConfig {
            dt: 0.0,
            num_timesteps: 3,
        };
        let err = transient_solve(&mut equation, &config, |_| {}).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }
}
