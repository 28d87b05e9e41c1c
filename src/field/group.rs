//! Field groups: collections of per-domain objects that together make up
//! one logical quantity or one physics' worth of domain data.
//!
//! `MeshField`, `BoundaryField`, and `IntegralField` are parallel vectors
//! (entry k of each covers domain k). `ScalarField` and `VariableField`
//! group per-domain values of one quantity; the variable group also owns
//! the dense field-id (fid) numbering used for matrix rows and columns.

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::boundary::Line2Boundary;
use crate::fem::Line2Integrals;
use crate::field::{Line2Scalar, Line2Variable};
use crate::mesh::Line2Mesh;

/// The meshes a physics is applied to, one per domain.
#[derive(Debug, Clone)]
pub struct MeshField {
    meshes: Vec<Rc<Line2Mesh>>,
}

impl MeshField {
    pub fn new(meshes: Vec<Rc<Line2Mesh>>) -> Self {
        Self { meshes }
    }

    pub fn meshes(&self) -> &[Rc<Line2Mesh>] {
        &self.meshes
    }

    pub fn num_domains(&self) -> usize {
        self.meshes.len()
    }
}

/// The boundary data of a physics, aligned with its mesh field.
#[derive(Debug, Clone)]
pub struct BoundaryField {
    boundaries: Vec<Rc<Line2Boundary>>,
}

impl BoundaryField {
    pub fn new(boundaries: Vec<Rc<Line2Boundary>>) -> Self {
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &[Rc<Line2Boundary>] {
        &self.boundaries
    }
}

/// The element integrals of a physics, aligned with its mesh field.
#[derive(Debug, Clone)]
pub struct IntegralField {
    integrals: Vec<Rc<Line2Integrals>>,
}

impl IntegralField {
    pub fn new(integrals: Vec<Rc<Line2Integrals>>) -> Self {
        Self { integrals }
    }

    pub fn integrals(&self) -> &[Rc<Line2Integrals>] {
        &self.integrals
    }
}

/// One known coefficient spanning several domains.
#[derive(Debug, Clone)]
pub struct ScalarField {
    scalars: Vec<Rc<Line2Scalar>>,
}

impl ScalarField {
    pub fn new(scalars: Vec<Rc<Line2Scalar>>) -> Self {
        Self { scalars }
    }

    pub fn scalars(&self) -> &[Rc<Line2Scalar>] {
        &self.scalars
    }

    /// The member scalar bound to the given mesh object.
    pub fn scalar_for_mesh(&self, mesh: &Rc<Line2Mesh>) -> Option<&Rc<Line2Scalar>> {
        self.scalars.iter().find(|s| Rc::ptr_eq(s.mesh(), mesh))
    }
}

/// One unknown quantity spanning several domains, with the dense fid
/// numbering over the union of member point gids.
///
/// fids are assigned in ascending gid order, so the numbering is a pure
/// function of the member meshes. A point gid shared by two domains (an
/// interface point) gets a single fid, which is what couples the domains
/// in the assembled system.
#[derive(Debug)]
pub struct VariableField {
    variables: Vec<Rc<Line2Variable>>,
    point_gid_vec: Vec<usize>,
    point_gid_to_fid: HashMap<usize, usize>,
    start_col: Cell<Option<usize>>,
}

impl VariableField {
    pub fn new(variables: Vec<Rc<Line2Variable>>) -> Rc<Self> {
        let mut gid_set = BTreeSet::new();
        for variable in &variables {
            for point in variable.mesh().points() {
                gid_set.insert(point.gid);
            }
        }

        let point_gid_vec: Vec<usize> = gid_set.into_iter().collect();
        let point_gid_to_fid = point_gid_vec
            .iter()
            .enumerate()
            .map(|(fid, &gid)| (gid, fid))
            .collect();

        Rc::new(Self {
            variables,
            point_gid_vec,
            point_gid_to_fid,
            start_col: Cell::new(None),
        })
    }

    pub fn variables(&self) -> &[Rc<Line2Variable>] {
        &self.variables
    }

    /// The member variable bound to the given mesh object.
    pub fn variable_for_mesh(&self, mesh: &Rc<Line2Mesh>) -> Option<&Rc<Line2Variable>> {
        self.variables.iter().find(|v| Rc::ptr_eq(v.mesh(), mesh))
    }

    /// Number of unique points in the field.
    pub fn num_point_field(&self) -> usize {
        self.point_gid_vec.len()
    }

    /// fid of a point gid, if the gid belongs to the field.
    pub fn fid(&self, gid: usize) -> Option<usize> {
        self.point_gid_to_fid.get(&gid).copied()
    }

    /// Point gid at a fid (inverse of [`fid`]).
    ///
    /// [`fid`]: VariableField::fid
    pub fn point_gid(&self, fid: usize) -> usize {
        self.point_gid_vec[fid]
    }

    pub fn point_gids(&self) -> &[usize] {
        &self.point_gid_vec
    }

    /// Column offset of this field's block in the global system; set by
    /// the matrix equation during construction.
    pub fn start_col(&self) -> Option<usize> {
        self.start_col.get()
    }

    pub fn set_start_col(&self, start_col: usize) {
        self.start_col.set(Some(start_col));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Line2Element, Point};

    fn mesh_with_gids(gids: &[usize], x0: f64) -> Rc<Line2Mesh> {
        let points = gids
            .iter()
            .enumerate()
            .map(|(i, &gid)| Point {
                gid,
                x: x0 + i as f64,
            })
            .collect();
        let elements = (0..gids.len() - 1)
            .map(|i| Line2Element::new(i + 100 * gids[0], gids[i], gids[i + 1]))
            .collect();
        Rc::new(Line2Mesh::new(points, elements).unwrap())
    }

    #[test]
    fn test_fid_union_over_two_domains() {
        // domains share gid 4 at their interface
        let mesh_a = mesh_with_gids(&[0, 2, 4], 0.0);
        let mesh_b = mesh_with_gids(&[4, 5, 9], 2.0);

        let var_a = Line2Variable::new(Rc::clone(&mesh_a), 0.0);
        let var_b = Line2Variable::new(Rc::clone(&mesh_b), 0.0);
        let field = VariableField::new(vec![var_a, var_b]);

        // union of {0,2,4} and {4,5,9}, ascending
        assert_eq!(field.num_point_field(), 5);
        assert_eq!(field.point_gids(), &[0, 2, 4, 5, 9]);

        // map and inverse agree
        for fid in 0..field.num_point_field() {
            assert_eq!(field.fid(field.point_gid(fid)), Some(fid));
        }
        assert_eq!(field.fid(4), Some(2));
        assert_eq!(field.fid(7), None);
    }

    #[test]
    fn test_fid_ordering_independent_of_member_order() {
        let mesh_a = mesh_with_gids(&[0, 2, 4], 0.0);
        let mesh_b = mesh_with_gids(&[4, 5, 9], 2.0);

        let forward = VariableField::new(vec![
            Line2Variable::new(Rc::clone(&mesh_a), 0.0),
            Line2Variable::new(Rc::clone(&mesh_b), 0.0),
        ]);
        let reversed = VariableField::new(vec![
            Line2Variable::new(Rc::clone(&mesh_b), 0.0),
            Line2Variable::new(Rc::clone(&mesh_a), 0.0),
        ]);

        assert_eq!(forward.point_gids(), reversed.point_gids());
    }

    #[test]
    fn test_lookup_by_mesh() {
        let mesh_a = mesh_with_gids(&[0, 1], 0.0);
        let mesh_b = mesh_with_gids(&[2, 3], 5.0);

        let scalar_a = Line2Scalar::new(Rc::clone(&mesh_a), 1.0);
        let scalar_b = Line2Scalar::new(Rc::clone(&mesh_b), 2.0);
        let field = ScalarField::new(vec![Rc::clone(&scalar_a), Rc::clone(&scalar_b)]);

        let found = field.scalar_for_mesh(&mesh_b).unwrap();
        assert!(Rc::ptr_eq(found, &scalar_b));
        assert_eq!(found.value(0), 2.0);

        let mesh_c = mesh_with_gids(&[8, 9], 9.0);
        assert!(field.scalar_for_mesh(&mesh_c).is_none());
    }

    #[test]
    fn test_start_col_cell() {
        let mesh = mesh_with_gids(&[0, 1], 0.0);
        let field = VariableField::new(vec![Line2Variable::new(mesh, 0.0)]);

        assert_eq!(field.start_col(), None);
        field.set_start_col(12);
        assert_eq!(field.start_col(), Some(12));
    }
}
