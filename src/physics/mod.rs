//! Physics: element-level contributions of one equation form to the
//! global matrix system.
//!
//! Each physics covers one unknown field over one or more domains. The
//! matrix equations consume physics through the [`SteadyPhysics`] /
//! [`TransientPhysics`] traits: `matrix_fill` writes the rows
//! `[start_row, start_row + num_point_field)` of the global system, with
//! the row offset assigned by the matrix equation at construction.

pub mod steady_convection_diffusion;
pub mod steady_diffusion;
pub mod transient_convection_diffusion;
pub mod transient_diffusion;

pub use steady_convection_diffusion::SteadyConvectionDiffusion;
pub use steady_diffusion::SteadyDiffusion;
pub use transient_convection_diffusion::TransientConvectionDiffusion;
pub use transient_diffusion::TransientDiffusion;

use std::rc::Rc;

use crate::boundary::{BoundaryConfig, Line2Boundary};
use crate::error::{Error, Result};
use crate::field::{BoundaryField, IntegralField, MeshField, ScalarField, VariableField};
use crate::linalg::SparseMatrix;
use crate::mesh::Line2Mesh;

/// A physics contributing to the steady system `A x = b`.
pub trait SteadyPhysics {
    /// Add this physics' element and boundary contributions to `A` and
    /// `b`. `x` is the current global solution estimate (unused by the
    /// linear forms, part of the contract for coefficient-free access).
    fn matrix_fill(&self, a: &mut SparseMatrix, b: &mut [f64], x: &[f64]) -> Result<()>;

    /// Row offset assigned by the matrix equation.
    fn set_start_row(&self, start_row: usize);

    fn start_row(&self) -> Option<usize>;

    /// The unknown fields this physics solves for.
    fn variable_fields(&self) -> Vec<Rc<VariableField>>;
}

/// A physics contributing to the transient system
/// `A x(t+1) = C x(t) + d` (backward Euler).
pub trait TransientPhysics {
    fn matrix_fill(
        &self,
        a: &mut SparseMatrix,
        c: &mut SparseMatrix,
        d: &mut [f64],
        x: &[f64],
        x_last: &[f64],
        dt: f64,
    ) -> Result<()>;

    fn set_start_row(&self, start_row: usize);

    fn start_row(&self) -> Option<usize>;

    fn variable_fields(&self) -> Vec<Rc<VariableField>>;
}

/// did and fid pairs for the endpoints of one element.
pub(crate) struct ElementIndices {
    pub dids: [usize; 2],
    pub fids: [usize; 2],
}

pub(crate) fn element_indices(
    mesh: &Line2Mesh,
    field: &VariableField,
    element_did: usize,
) -> Result<ElementIndices> {
    let gids = mesh.element(element_did).point_gids();
    let mut dids = [0; 2];
    let mut fids = [0; 2];
    for (slot, &gid) in gids.iter().enumerate() {
        dids[slot] = mesh.point_did(gid).ok_or_else(|| {
            Error::InvalidReference(format!("point gid {} missing from mesh", gid))
        })?;
        fids[slot] = field.fid(gid).ok_or_else(|| {
            Error::InvalidReference(format!("point gid {} missing from variable field", gid))
        })?;
    }
    Ok(ElementIndices { dids, fids })
}

/// Check that the per-domain groups of a physics line up: one boundary
/// and one integral store per mesh, each tied to that same mesh object.
pub(crate) fn validate_domain_alignment(
    meshes: &MeshField,
    boundaries: &BoundaryField,
    integrals: &IntegralField,
) -> Result<()> {
    if boundaries.boundaries().len() != meshes.num_domains()
        || integrals.integrals().len() != meshes.num_domains()
    {
        return Err(Error::InvalidReference(format!(
            "physics covers {} domain(s) but has {} boundary group(s) and {} integral group(s)",
            meshes.num_domains(),
            boundaries.boundaries().len(),
            integrals.integrals().len()
        )));
    }

    for (k, mesh) in meshes.meshes().iter().enumerate() {
        if !Rc::ptr_eq(boundaries.boundaries()[k].mesh(), mesh) {
            return Err(Error::InvalidReference(format!(
                "boundary group {} is tied to a different mesh than mesh group {}",
                k, k
            )));
        }
        if !Rc::ptr_eq(integrals.integrals()[k].mesh(), mesh) {
            return Err(Error::InvalidReference(format!(
                "integral group {} is tied to a different mesh than mesh group {}",
                k, k
            )));
        }
        boundaries.boundaries()[k].validate_configs()?;
    }
    Ok(())
}

/// Check that the unknown field has a variable on every covered mesh.
pub(crate) fn validate_variable_field(meshes: &MeshField, field: &VariableField) -> Result<()> {
    for mesh in meshes.meshes() {
        if field.variable_for_mesh(mesh).is_none() {
            return Err(Error::InvalidReference(
                "variable field has no member on a mesh covered by the physics".to_string(),
            ));
        }
    }
    Ok(())
}

/// Check that a coefficient field has a scalar on every covered mesh.
pub(crate) fn validate_scalar_field(
    meshes: &MeshField,
    field: &ScalarField,
    role: &str,
) -> Result<()> {
    for mesh in meshes.meshes() {
        if field.scalar_for_mesh(mesh).is_none() {
            return Err(Error::InvalidReference(format!(
                "{} field has no member on a mesh covered by the physics",
                role
            )));
        }
    }
    Ok(())
}

pub(crate) fn start_col_of(field: &VariableField) -> Result<usize> {
    field.start_col().ok_or_else(|| {
        Error::InvalidReference("variable field start_col unset at assembly time".to_string())
    })
}

pub(crate) fn start_row_or_err(start_row: Option<usize>) -> Result<usize> {
    start_row.ok_or_else(|| {
        Error::InvalidReference("physics start_row unset at assembly time".to_string())
    })
}

fn boundary_point_fid(
    mesh: &Line2Mesh,
    field: &VariableField,
    element_gid: usize,
    local_point: usize,
) -> Result<usize> {
    let element_did = mesh.element_did(element_gid).ok_or_else(|| {
        Error::InvalidReference(format!(
            "boundary references element gid {} missing from mesh",
            element_gid
        ))
    })?;
    let gid = mesh.element(element_did).point_gids()[local_point];
    field.fid(gid).ok_or_else(|| {
        Error::InvalidReference(format!("point gid {} missing from variable field", gid))
    })
}

fn config_of<'a>(boundary: &'a Line2Boundary, config_id: usize) -> Result<&'a BoundaryConfig> {
    boundary.config(config_id).ok_or_else(|| {
        Error::InvalidReference(format!(
            "boundary config id {} referenced but never registered",
            config_id
        ))
    })
}

/// Apply one domain's boundary conditions to the steady system.
///
/// The pass order is contractual: flux contributions first, then the
/// erasure of every value-constrained row, then the Dirichlet unit
/// diagonal. Flux contributions on Dirichlet points are therefore
/// discarded. Entries with `local_point == None` are alignment
/// placeholders and skipped in every pass.
pub(crate) fn apply_boundary_steady(
    a: &mut SparseMatrix,
    b: &mut [f64],
    start_row: usize,
    value_field: &VariableField,
    mesh: &Line2Mesh,
    boundary: &Line2Boundary,
) -> Result<()> {
    let start_col = start_col_of(value_field)?;

    for entry in boundary.flux_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        match *config_of(boundary, entry.config_id)? {
            BoundaryConfig::Neumann { flux } => {
                b[row] += flux;
            }
            BoundaryConfig::Robin {
                constant,
                coefficient,
            } => {
                b[row] += constant;
                a.add(row, start_col + fid, -coefficient);
            }
            BoundaryConfig::Dirichlet { .. } => {}
        }
    }

    for entry in boundary.value_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        a.zero_row(row);
        b[row] = 0.0;
    }

    for entry in boundary.value_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        if let BoundaryConfig::Dirichlet { value } = *config_of(boundary, entry.config_id)? {
            a.add(row, start_col + fid, 1.0);
            b[row] += value;
        }
    }

    Ok(())
}

/// Apply one domain's boundary conditions to the transient system.
///
/// Same pass order as the steady form; the value rows are erased in both
/// `A` and `C`, and the Robin coefficient enters `A` with the opposite
/// sign convention.
pub(crate) fn apply_boundary_transient(
    a: &mut SparseMatrix,
    c: &mut SparseMatrix,
    d: &mut [f64],
    start_row: usize,
    value_field: &VariableField,
    mesh: &Line2Mesh,
    boundary: &Line2Boundary,
) -> Result<()> {
    let start_col = start_col_of(value_field)?;

    for entry in boundary.flux_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        match *config_of(boundary, entry.config_id)? {
            BoundaryConfig::Neumann { flux } => {
                d[row] += flux;
            }
            BoundaryConfig::Robin {
                constant,
                coefficient,
            } => {
                d[row] += constant;
                a.add(row, start_col + fid, coefficient);
            }
            BoundaryConfig::Dirichlet { .. } => {}
        }
    }

    for entry in boundary.value_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        a.zero_row(row);
        c.zero_row(row);
        d[row] = 0.0;
    }

    for entry in boundary.value_elements() {
        let local_point = match entry.local_point {
            Some(lid) => lid,
            None => continue,
        };
        let fid = boundary_point_fid(mesh, value_field, entry.element_gid, local_point)?;
        let row = start_row + fid;
        if let BoundaryConfig::Dirichlet { value } = *config_of(boundary, entry.config_id)? {
            a.add(row, start_col + fid, 1.0);
            d[row] += value;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryElement, BoundaryKind};
    use crate::field::Line2Variable;
    use crate::mesh::{Line2Element, Point};
    use approx::assert_relative_eq;

    fn single_element_setup(
        flux: Vec<BoundaryElement>,
        value: Vec<BoundaryElement>,
    ) -> (Rc<Line2Mesh>, Line2Boundary, Rc<VariableField>) {
        let points = vec![Point { gid: 0, x: 0.0 }, Point { gid: 1, x: 1.0 }];
        let elements = vec![Line2Element::new(0, 0, 1)];
        let mesh = Rc::new(Line2Mesh::new(points, elements).unwrap());
        let boundary = Line2Boundary::new(Rc::clone(&mesh), flux, value).unwrap();
        let field = VariableField::new(vec![Line2Variable::new(Rc::clone(&mesh), 0.0)]);
        field.set_start_col(0);
        (mesh, boundary, field)
    }

    // flux -> zero-row -> dirichlet: a Neumann flux landing on a point
    // that also carries a Dirichlet value must be erased by the
    // row-zeroing pass
    #[test]
    fn test_flux_on_dirichlet_point_is_discarded() {
        let entry = |config_id| BoundaryElement {
            element_gid: 0,
            local_point: Some(0),
            config_id,
        };
        let (mesh, mut boundary, field) = single_element_setup(vec![entry(0)], vec![entry(1)]);
        boundary
            .set_boundary_condition(0, BoundaryKind::Neumann, &[7.0])
            .unwrap();
        boundary
            .set_boundary_condition(1, BoundaryKind::Dirichlet, &[3.0])
            .unwrap();

        let mut a = SparseMatrix::zeros(2, 2);
        let mut b = vec![0.0; 2];
        // stale element-assembly content the zero pass must erase
        a.add(0, 0, 42.0);
        a.add(0, 1, 42.0);
        b[0] = 42.0;

        apply_boundary_steady(&mut a, &mut b, 0, &field, &mesh, &boundary).unwrap();

        let a = a.to_csr();
        assert_relative_eq!(*a.get(0, 0).unwrap(), 1.0, epsilon = 1e-14);
        assert!(a.get(0, 1).is_none());
        assert_relative_eq!(b[0], 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_inert_entries_are_skipped() {
        let inert = BoundaryElement {
            element_gid: 0,
            local_point: None,
            config_id: 0,
        };
        let (mesh, mut boundary, field) =
            single_element_setup(vec![inert], vec![inert]);
        boundary
            .set_boundary_condition(0, BoundaryKind::Dirichlet, &[9.0])
            .unwrap();

        let mut a = SparseMatrix::zeros(2, 2);
        let mut b = vec![0.0; 2];
        apply_boundary_steady(&mut a, &mut b, 0, &field, &mesh, &boundary).unwrap();

        assert_eq!(a.nnz(), 0);
        assert_eq!(b, vec![0.0, 0.0]);
    }

    // the Robin matrix coefficient enters with opposite signs in the
    // steady and transient forms
    #[test]
    fn test_robin_sign_convention() {
        let entry = BoundaryElement {
            element_gid: 0,
            local_point: Some(1),
            config_id: 0,
        };
        let (mesh, mut boundary, field) = single_element_setup(vec![entry], vec![]);
        boundary
            .set_boundary_condition(0, BoundaryKind::Robin, &[50.0, -5.0])
            .unwrap();

        let mut a = SparseMatrix::zeros(2, 2);
        let mut b = vec![0.0; 2];
        apply_boundary_steady(&mut a, &mut b, 0, &field, &mesh, &boundary).unwrap();
        let a = a.to_csr();
        assert_relative_eq!(*a.get(1, 1).unwrap(), 5.0, epsilon = 1e-14);
        assert_relative_eq!(b[1], 50.0, epsilon = 1e-14);

        let mut a = SparseMatrix::zeros(2, 2);
        let mut c = SparseMatrix::zeros(2, 2);
        let mut d = vec![0.0; 2];
        apply_boundary_transient(&mut a, &mut c, &mut d, 0, &field, &mesh, &boundary).unwrap();
        let a = a.to_csr();
        assert_relative_eq!(*a.get(1, 1).unwrap(), -5.0, epsilon = 1e-14);
        assert_relative_eq!(d[1], 50.0, epsilon = 1e-14);
    }
}
