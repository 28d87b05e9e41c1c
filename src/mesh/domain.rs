use std::collections::HashMap;

use crate::error::{Error, Result};

/// A mesh point with its global id and position.
///
/// The global id (`gid`) is unique across every mesh in a simulation; the
/// domain id (`did`) is the dense index of the point within one mesh and
/// is implied by storage order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub gid: usize,
    pub x: f64,
}

/// A two-node line element spanning `[x_{p0}, x_{p1}]`.
///
/// Point 0 and point 1 are the left and right endpoints as given in the
/// input; the orientation is not constrained, but the element length must
/// be nonzero for integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2Element {
    pub gid: usize,
    pub p0_gid: usize,
    pub p1_gid: usize,
}

impl Line2Element {
    pub fn new(gid: usize, p0_gid: usize, p1_gid: usize) -> Self {
        Self { gid, p0_gid, p1_gid }
    }

    /// Endpoint gids as an array indexable by local point id.
    pub fn point_gids(&self) -> [usize; 2] {
        [self.p0_gid, self.p1_gid]
    }
}

/// Points and line2 elements of one 1D domain.
///
/// Construction validates the topology; afterwards the mesh is immutable
/// and may be shared freely between boundaries, integrals, and fields.
#[derive(Debug, Clone)]
pub struct Line2Mesh {
    points: Vec<Point>,
    elements: Vec<Line2Element>,
    point_did: HashMap<usize, usize>,
    element_did: HashMap<usize, usize>,
}

impl Line2Mesh {
    /// Build a mesh from point and element lists.
    ///
    /// # Errors
    /// * `DuplicatePointGid` if two points share a gid
    /// * `UnknownPointGid` if an element endpoint is not in the point list
    /// * `EmptyMesh` if there are no elements
    pub fn new(points: Vec<Point>, elements: Vec<Line2Element>) -> Result<Self> {
        let mut point_did = HashMap::with_capacity(points.len());
        for (did, point) in points.iter().enumerate() {
            if point_did.insert(point.gid, did).is_some() {
                return Err(Error::DuplicatePointGid(point.gid));
            }
        }

        if elements.is_empty() {
            return Err(Error::EmptyMesh);
        }

        let mut element_did = HashMap::with_capacity(elements.len());
        for (did, element) in elements.iter().enumerate() {
            for point_gid in element.point_gids() {
                if !point_did.contains_key(&point_gid) {
                    return Err(Error::UnknownPointGid {
                        element_gid: element.gid,
                        point_gid,
                    });
                }
            }
            element_did.insert(element.gid, did);
        }

        Ok(Self {
            points,
            elements,
            point_did,
            element_did,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn elements(&self) -> &[Line2Element] {
        &self.elements
    }

    /// Point at the given domain id.
    pub fn point(&self, did: usize) -> &Point {
        &self.points[did]
    }

    /// Element at the given domain id.
    pub fn element(&self, did: usize) -> &Line2Element {
        &self.elements[did]
    }

    /// Domain id of the point with the given gid.
    pub fn point_did(&self, gid: usize) -> Option<usize> {
        self.point_did.get(&gid).copied()
    }

    /// Domain id of the element with the given gid.
    pub fn element_did(&self, gid: usize) -> Option<usize> {
        self.element_did.get(&gid).copied()
    }

    /// x-coordinates of an element's endpoints in local point order.
    pub fn element_endpoints(&self, element_did: usize) -> [f64; 2] {
        let element = &self.elements[element_did];
        let p0_did = self.point_did[&element.p0_gid];
        let p1_did = self.point_did[&element.p1_gid];
        [self.points[p0_did].x, self.points[p1_did].x]
    }
}
