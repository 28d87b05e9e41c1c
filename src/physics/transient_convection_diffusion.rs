//! Transient single-component convection-diffusion:
//! `a du/dt = -d/dx(-b du/dx + u v) + c`, discretised with backward Euler.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::field::{BoundaryField, IntegralField, MeshField, ScalarField, VariableField};
use crate::linalg::SparseMatrix;
use crate::physics::{
    apply_boundary_transient, element_indices, start_col_of, start_row_or_err,
    validate_domain_alignment, validate_scalar_field, validate_variable_field, TransientPhysics,
};

/// Transient convection-diffusion over one or more domains.
///
/// * `u` — the unknown (value field)
/// * `a` — time-derivative coefficient field
/// * `b` — diffusion coefficient field
/// * `v` — x-velocity field
/// * `c` — generation coefficient field
pub struct TransientConvectionDiffusion {
    meshes: MeshField,
    boundaries: BoundaryField,
    integrals: IntegralField,
    value_field: Rc<VariableField>,
    derivative: ScalarField,
    diffusion: ScalarField,
    velocity_x: ScalarField,
    generation: ScalarField,
    start_row: Cell<Option<usize>>,
}

impl TransientConvectionDiffusion {
    pub fn new(
        meshes: MeshField,
        boundaries: BoundaryField,
        integrals: IntegralField,
        value_field: Rc<VariableField>,
        derivative: ScalarField,
        diffusion: ScalarField,
        velocity_x: ScalarField,
        generation: ScalarField,
    ) -> Result<Self> {
        validate_domain_alignment(&meshes, &boundaries, &integrals)?;
        validate_variable_field(&meshes, &value_field)?;
        validate_scalar_field(&meshes, &derivative, "derivative coefficient")?;
        validate_scalar_field(&meshes, &diffusion, "diffusion coefficient")?;
        validate_scalar_field(&meshes, &velocity_x, "velocity")?;
        validate_scalar_field(&meshes, &generation, "generation coefficient")?;

        for store in integrals.integrals() {
            if !store.has_ni_nj()
                || !store.has_grad_ni_grad_nj()
                || !store.has_ni()
                || !store.has_ni_dnj_dx()
                || !store.has_ni_nj_dnk_dx()
            {
                return Err(Error::InvalidReference(
                    "transient convection-diffusion requires evaluated ∫Ni Nj, ∫∇Ni·∇Nj, \
                     ∫Ni, ∫Ni dNj/dx, and ∫Ni Nj dNk/dx integrals"
                        .to_string(),
                ));
            }
        }

        Ok(Self {
            meshes,
            boundaries,
            integrals,
            value_field,
            derivative,
            diffusion,
            velocity_x,
            generation,
            start_row: Cell::new(None),
        })
    }
}

impl TransientPhysics for TransientConvectionDiffusion {
    fn matrix_fill(
        &self,
        a: &mut SparseMatrix,
        c: &mut SparseMatrix,
        d: &mut [f64],
        _x: &[f64],
        _x_last: &[f64],
        dt: f64,
    ) -> Result<()> {
        let start_row = start_row_or_err(self.start_row.get())?;
        let start_col = start_col_of(&self.value_field)?;

        for (k, mesh) in self.meshes.meshes().iter().enumerate() {
            let boundary = &self.boundaries.boundaries()[k];
            let store = &self.integrals.integrals()[k];
            let derivative = self.derivative.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("derivative coefficient missing for mesh".to_string())
            })?;
            let diffusion = self.diffusion.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("diffusion coefficient missing for mesh".to_string())
            })?;
            let velocity_x = self.velocity_x.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("velocity missing for mesh".to_string())
            })?;
            let generation = self.generation.scalar_for_mesh(mesh).ok_or_else(|| {
                Error::InvalidReference("generation coefficient missing for mesh".to_string())
            })?;

            for element_did in 0..mesh.num_elements() {
                let idx = element_indices(mesh, &self.value_field, element_did)?;
                let derv = [derivative.value(idx.dids[0]), derivative.value(idx.dids[1])];
                let diff = [diffusion.value(idx.dids[0]), diffusion.value(idx.dids[1])];
                let velx = [velocity_x.value(idx.dids[0]), velocity_x.value(idx.dids[1])];
                let gen = [generation.value(idx.dids[0]), generation.value(idx.dids[1])];

                for i in 0..2 {
                    let row = start_row + idx.fids[i];
                    for j in 0..2 {
                        let col = start_col + idx.fids[j];
                        let mass = store.ni_nj(element_did, i, j);

                        let mut dvelx_dx = 0.0;
                        for (vk, &vel) in velx.iter().enumerate() {
                            dvelx_dx += vel * store.ni_nj_dnk_dx(element_did, i, j, vk);
                        }

                        a.add(
                            row,
                            col,
                            (derv[i] / dt) * mass
                                + diff[i] * store.grad_ni_grad_nj(element_did, i, j)
                                + velx[i] * store.ni_dnj_dx(element_did, i, j)
                                + dvelx_dx,
                        );
                        c.add(row, col, (derv[i] / dt) * mass);
                    }
                    d[row] += gen[i] * store.ni(element_did, i);
                }
            }

            apply_boundary_transient(a, c, d, start_row, &self.value_field, mesh, boundary)?;
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
