//! Steady single-component diffusion: `0 = -d/dx(-b du/dx) + c`.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::field::{BoundaryField, IntegralField, MeshField, ScalarField, VariableField};
use crate::linalg::SparseMatrix;
use crate::physics::{
    apply_boundary_steady, element_indices, start_col_of, start_row_or_err, validate_domain_alignment,
    validate_scalar_field, validate_variable_field, SteadyPhysics,
};

/// Steady diffusion over one or more domains.
///
/// * `u` — the unknown (value field), solved by the matrix equation
/// * `b` — diffusion coefficient field
/// * `c` — generation coefficient field
///
/// Coefficients are sampled at the test-function node, not integrated
/// pointwise across the element.
#[derive(Debug)]
pub struct SteadyDiffusion {
    meshes: MeshField,
    boundaries: BoundaryField,
    integrals: IntegralField,
    value_field: Rc<VariableField>,
    diffusion: ScalarField,
    generation: ScalarField,
    start_row: Cell<Option<usize>>,
}

impl SteadyDiffusion {
    /// Build the physics, validating every cross-reference.
    ///
    /// The integral stores must already hold ∫∇Ni·∇Nj and ∫Ni; integral
    /// evaluation is explicit and never happens during assembly.
    pub fn new(
        meshes: MeshField,
        boundaries: BoundaryField,
        integrals: IntegralField,
        value_field: Rc<VariableField>,
        diffusion: ScalarField,
        generation: ScalarField,
    ) -> Result<Self> {
        validate_domain_alignment(&meshes, &boundaries, &integrals)?;
        validate_variable_field(&meshes, &value_field)?;
        validate_scalar_field(&meshes, &diffusion, "diffusion coefficient")?;
        validate_scalar_field(&meshes, &generation, "generation coefficient")?;

        for store in integrals.integrals() {
            if !store.has_grad_ni_grad_nj() || !store.has_ni() {
                return Err(Error::InvalidReference(
                    "steady diffusion requires evaluated ∫∇Ni·∇Nj and ∫Ni integrals".to_string(),
                ));
            }
        }

        Ok(Self {
            meshes,
            boundaries,
            integrals,
            value_field,
            diffusion,
            generation,
            start_row: Cell::new(None),
        })
    }
}

impl SteadyPhysics for SteadyDiffusion {
    fn matrix_fill(&self, a: &mut SparseMatrix, b: &mut [f64], _x: &[f64]) -> Result<()> {
        let start_row = start_row_or_err(self.start_row.get())?;
        let start_col = start_col_of(&self.value_field)?;

        for (k, mesh) in self.meshes.meshes().iter().enumerate() {
            let boundary = &self.boundaries.boundaries()[k];
            let store = &self.integrals.integrals()[k];
            let diffusion = self.diffusion.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("diffusion coefficient missing for mesh".to_string())
            })?;
            let generation = self.generation.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("generation coefficient missing for mesh".to_string())
            })?;

            for element_did in 0..mesh.num_elements() {
                let idx = element_indices(mesh, &self.value_field, element_did)?;
                let diff = [diffusion.value(idx.dids[0]), diffusion.value(idx.dids[1])];
                let gen = [generation.value(idx.dids[0]), generation.value(idx.dids[1])];

                for i in 0..2 {
                    let row = start_row + idx.fids[i];
                    for j in 0..2 {
                        a.add(
                            row,
                            start_col + idx.fids[j],
                            diff[i] * store.grad_ni_grad_nj(element_did, i, j),
                        );
                    }
                    b[row] += gen[i] * store.ni(element_did, i);
                }
            }

            apply_boundary_steady(a, b, start_row, &self.value_field, mesh, boundary)?;
        }

        Ok(())
    }

    fn set_start_row(&self, start_row: usize) {
        self.start_row.set(Some(start_row));
    }

    fn start_row(&self) -> Option<usize> {
        self.start_row.get()
    }

    fn variable_fields(&self) -> Vec<Rc<VariableField>> {
        vec![Rc::clone(&self.value_field)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Line2Boundary;
    use crate::fem::Line2Integrals;
    use crate::field::{Line2Scalar, Line2Variable};
    use crate::mesh::{Line2Element, Line2Mesh, Point};
    use approx::assert_relative_eq;

    fn single_element_mesh() -> Rc<Line2Mesh> {
        let points = vec![Point { gid: 0, x: 0.0 }, Point { gid: 1, x: 2.0 }];
        let elements = vec![Line2Element::new(0, 0, 1)];
        Rc::new(Line2Mesh::new(points, elements).unwrap())
    }

    fn physics_parts(
        mesh: &Rc<Line2Mesh>,
        evaluate: bool,
    ) -> (BoundaryField, IntegralField, Rc<VariableField>) {
        let boundary = Rc::new(Line2Boundary::new(Rc::clone(mesh), vec![], vec![]).unwrap());
        let mut integrals = Line2Integrals::new(Rc::clone(mesh));
        if evaluate {
            integrals.evaluate_all().unwrap();
        }
        let variable = Line2Variable::new(Rc::clone(mesh), 0.0);
        (
            BoundaryField::new(vec![boundary]),
            IntegralField::new(vec![Rc::new(integrals)]),
            VariableField::new(vec![variable]),
        )
    }

    // element [0,2] with b = 2, c = 6: the stencil is b times the unit
    // stiffness and the load is c times the half-length
    #[test]
    fn test_element_contribution_values() {
        let mesh = single_element_mesh();
        let (boundaries, integrals, value_field) = physics_parts(&mesh, true);
        value_field.set_start_col(0);

        let physics = SteadyDiffusion::new(
            MeshField::new(vec![Rc::clone(&mesh)]),
            boundaries,
            integrals,
            value_field,
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 2.0)]),
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 6.0)]),
        )
        .unwrap();
        physics.set_start_row(0);

        let mut a = SparseMatrix::zeros(2, 2);
        let mut b = vec![0.0; 2];
        physics.matrix_fill(&mut a, &mut b, &[0.0, 0.0]).unwrap();

        let a = a.to_csr();
        assert_relative_eq!(*a.get(0, 0).unwrap(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(*a.get(0, 1).unwrap(), -1.0, epsilon = 1e-14);
        assert_relative_eq!(*a.get(1, 0).unwrap(), -1.0, epsilon = 1e-14);
        assert_relative_eq!(*a.get(1, 1).unwrap(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(b[0], 6.0, epsilon = 1e-14);
        assert_relative_eq!(b[1], 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_unevaluated_integrals_rejected() {
        let mesh = single_element_mesh();
        let (boundaries, integrals, value_field) = physics_parts(&mesh, false);

        let err = SteadyDiffusion::new(
            MeshField::new(vec![Rc::clone(&mesh)]),
            boundaries,
            integrals,
            value_field,
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 1.0)]),
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 0.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
    }

    #[test]
    fn test_coefficient_on_wrong_mesh_rejected() {
        let mesh = single_element_mesh();
        let other = Rc::new(
            Line2Mesh::new(
                vec![Point { gid: 5, x: 0.0 }, Point { gid: 6, x: 1.0 }],
                vec![Line2Element::new(9, 5, 6)],
            )
            .unwrap(),
        );
        let (boundaries, integrals, value_field) = physics_parts(&mesh, true);

        let err = SteadyDiffusion::new(
            MeshField::new(vec![Rc::clone(&mesh)]),
            boundaries,
            integrals,
            value_field,
            ScalarField::new(vec![Line2Scalar::new(other, 1.0)]),
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 0.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
    }

    #[test]
    fn test_fill_requires_assigned_offsets() {
        let mesh = single_element_mesh();
        let (boundaries, integrals, value_field) = physics_parts(&mesh, true);

        let physics = SteadyDiffusion::new(
            MeshField::new(vec![Rc::clone(&mesh)]),
            boundaries,
            integrals,
            value_field,
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 1.0)]),
            ScalarField::new(vec![Line2Scalar::new(Rc::clone(&mesh), 0.0)]),
        )
        .unwrap();

        let mut a = SparseMatrix::zeros(2, 2);
        let mut b = vec![0.0; 2];
        let err = physics.matrix_fill(&mut a, &mut b, &[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidReference(_)));
    }
}
