//! Steady diffusion on a single domain: uniform conductivity and heat
//! generation with a Dirichlet value on the left and a Neumann flux on
//! the right.
//!
//! For b = 1, c = 100, u(0) = 50, and a right-hand flux term of 2, the
//! solution of 0 = (b u')' + c is the parabola
//! u(x) = -50 x^2 + 102 x + 50, and linear elements reproduce it exactly
//! at the nodes.

use std::rc::Rc;

use approx::assert_relative_eq;
use fem1d::{
    steady_solve, BoundaryElement, BoundaryField, BoundaryKind, IntegralField, Line2Boundary,
    Line2Element, Line2Integrals, Line2Mesh, Line2Scalar, Line2Variable, MeshField, Point,
    ScalarField, SteadyConfig, SteadyDiffusion, SteadyEquation, SteadyPhysics, VariableField,
};

fn unit_interval_mesh(num_elements: usize, first_gid: usize) -> Rc<Line2Mesh> {
    let h = 1.0 / num_elements as f64;
    let points = (0..=num_elements)
        .map(|i| Point {
            gid: first_gid + i,
            x: i as f64 * h,
        })
        .collect();
    let elements = (0..num_elements)
        .map(|i| Line2Element::new(first_gid + i, first_gid + i, first_gid + i + 1))
        .collect();
    Rc::new(Line2Mesh::new(points, elements).unwrap())
}

struct HeatProblem {
    mesh: Rc<Line2Mesh>,
    temperature: Rc<Line2Variable>,
    physics: Rc<SteadyDiffusion>,
}

/// E1 setup: left Dirichlet u = 50, right Neumann flux 2, b = 1, c = 100.
fn heat_problem(first_gid: usize) -> HeatProblem {
    let num_elements = 10;
    let mesh = unit_interval_mesh(num_elements, first_gid);

    let mut boundary = Line2Boundary::new(
        Rc::clone(&mesh),
        vec![BoundaryElement {
            element_gid: first_gid + num_elements - 1,
            local_point: Some(1),
            config_id: 0,
        }],
        vec![BoundaryElement {
            element_gid: first_gid,
            local_point: Some(0),
            config_id: 1,
        }],
    )
    .unwrap();
    boundary
        .set_boundary_condition(0, BoundaryKind::Neumann, &[2.0])
        .unwrap();
    boundary
        .set_boundary_condition(1, BoundaryKind::Dirichlet, &[50.0])
        .unwrap();
    let boundary = Rc::new(boundary);

    let mut integrals = Line2Integrals::new(Rc::clone(&mesh));
    integrals.evaluate_all().unwrap();
    let integrals = Rc::new(integrals);

    let temperature = Line2Variable::new(Rc::clone(&mesh), 0.0);
    let conductivity = Line2Scalar::new(Rc::clone(&mesh), 1.0);
    let heat_generation = Line2Scalar::new(Rc::clone(&mesh), 100.0);

    let physics = Rc::new(
        SteadyDiffusion::new(
            MeshField::new(vec![Rc::clone(&mesh)]),
            BoundaryField::new(vec![boundary]),
            IntegralField::new(vec![integrals]),
            VariableField::new(vec![Rc::clone(&temperature)]),
            ScalarField::new(vec![conductivity]),
            ScalarField::new(vec![heat_generation]),
        )
        .unwrap(),
    );

    HeatProblem {
        mesh,
        temperature,
        physics,
    }
}

fn exact_parabola(x: f64) -> f64 {
    -50.0 * x * x + 102.0 * x + 50.0
}

#[test]
fn test_uniform_heat_generation_matches_parabola() {
    let problem = heat_problem(0);
    let mut equation = SteadyEquation::new(vec![problem.physics as Rc<dyn SteadyPhysics>]).unwrap();

    let stats = steady_solve(&mut equation, &SteadyConfig::default(), |_| {}).unwrap();
    assert!(stats.converged);
    assert_eq!(stats.iterations, 2);

    for point in problem.mesh.points() {
        let did = problem.mesh.point_did(point.gid).unwrap();
        assert_relative_eq!(
            problem.temperature.value(did),
            exact_parabola(point.x),
            epsilon = 1e-8
        );
    }

    // midpoint spot value
    let mid = problem.mesh.point_did(5).unwrap();
    assert_relative_eq!(problem.temperature.value(mid), 88.5, epsilon = 1e-8);
}

#[test]
fn test_dirichlet_node_takes_prescribed_value() {
    let problem = heat_problem(0);
    let mut equation = SteadyEquation::new(vec![problem.physics as Rc<dyn SteadyPhysics>]).unwrap();

    equation.iterate_solution().unwrap();
    equation.store_solution();

    let left = problem.mesh.point_did(0).unwrap();
    assert_relative_eq!(problem.temperature.value(left), 50.0, epsilon = 1e-9);
}

/// Two independent copies of the same problem solved as one concatenated
/// system exercise the start_row / start_col block offsets.
#[test]
fn test_two_physics_blocks_solve_independently() {
    let first = heat_problem(0);
    let second = heat_problem(100);

    let mut equation = SteadyEquation::new(vec![
        Rc::clone(&first.physics) as Rc<dyn SteadyPhysics>,
        Rc::clone(&second.physics) as Rc<dyn SteadyPhysics>,
    ])
    .unwrap();
    assert_eq!(equation.num_dof(), 22);
    assert_eq!(first.physics.start_row(), Some(0));
    assert_eq!(second.physics.start_row(), Some(11));

    let stats = steady_solve(&mut equation, &SteadyConfig::default(), |_| {}).unwrap();
    assert!(stats.converged);

    for problem in [&first, &second] {
        for point in problem.mesh.points() {
            let did = problem.mesh.point_did(point.gid).unwrap();
            assert_relative_eq!(
                problem.temperature.value(did),
                exact_parabola(point.x),
                epsilon = 1e-8
            );
        }
    }
}
