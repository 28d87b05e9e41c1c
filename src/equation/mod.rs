//! Global matrix equations: concatenation of one or more physics into a
//! single sparse linear system, solver invocation, and write-back of the
//! solution into the bound variables.

pub mod steady;
pub mod transient;

pub use steady::SteadyEquation;
pub use transient::TransientEquation;

use std::rc::Rc;

use crate::field::VariableField;

/// Assign column offsets to the unique variable fields across all
/// physics, in the order each field is first encountered.
///
/// Returns the deduplicated fields, their offsets, and the total column
/// count.
pub(crate) fn assign_start_cols(
    per_physics_fields: &[Vec<Rc<VariableField>>],
) -> (Vec<Rc<VariableField>>, Vec<usize>, usize) {
    let mut fields: Vec<Rc<VariableField>> = Vec::new();
    let mut start_cols = Vec::new();
    let mut col = 0;

    for physics_fields in per_physics_fields {
        for field in physics_fields {
            if !fields.iter().any(|known| Rc::ptr_eq(known, field)) {
                field.set_start_col(col);
                start_cols.push(col);
                col += field.num_point_field();
                fields.push(Rc::clone(field));
            }
        }
    }

    (fields, start_cols, col)
}

/// Write solution block values back into every member variable of each
/// field, routing through the gid → did map of each variable's mesh.
pub(crate) fn store_fields(
    fields: &[Rc<VariableField>],
    start_cols: &[usize],
    x: &[f64],
) {
    for (field, &start_col) in fields.iter().zip(start_cols.iter()) {
        for fid in 0..field.num_point_field() {
            let gid = field.point_gid(fid);
            let value = x[start_col + fid];
            for variable in field.variables() {
                if let Some(did) = variable.mesh().point_did(gid) {
                    variable.set_value(did, value);
                }
            }
        }
    }
}

/// Gather current variable values into a global vector (the inverse of
/// [`store_fields`]); used to seed the transient history with the
/// client-set initial condition.
pub(crate) fn gather_fields(
    fields: &[Rc<VariableField>],
    start_cols: &[usize],
    num_dof: usize,
) -> Vec<f64> {
    let mut x = vec![0.0; num_dof];
    for (field, &start_col) in fields.iter().zip(start_cols.iter()) {
        for fid in 0..field.num_point_field() {
            let gid = field.point_gid(fid);
            for variable in field.variables() {
                if let Some(did) = variable.mesh().point_did(gid) {
                    x[start_col + fid] = variable.value(did);
                }
            }
        }
    }
    x
}
