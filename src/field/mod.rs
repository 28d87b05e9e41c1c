pub mod group;

pub use group::{BoundaryField, IntegralField, MeshField, ScalarField, VariableField};

use std::cell::{Ref, RefCell};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use crate::error::Result;
use crate::mesh::Line2Mesh;

/// A known per-point coefficient over one mesh.
///
/// Values are interior-mutable so a Picard loop can refresh coefficients
/// that depend on the current solution between iterations.
#[derive(Debug)]
pub struct Line2Scalar {
    mesh: Rc<Line2Mesh>,
    values: RefCell<Vec<f64>>,
}

impl Line2Scalar {
    /// Create with a uniform value at every point.
    pub fn new(mesh: Rc<Line2Mesh>, initial: f64) -> Rc<Self> {
        let values = vec![initial; mesh.num_points()];
        Rc::new(Self {
            mesh,
            values: RefCell::new(values),
        })
    }

    /// Create with values computed from each point's position.
    pub fn from_fn(mesh: Rc<Line2Mesh>, f: impl Fn(f64) -> f64) -> Rc<Self> {
        let values = mesh.points().iter().map(|p| f(p.x)).collect();
        Rc::new(Self {
            mesh,
            values: RefCell::new(values),
        })
    }

    pub fn mesh(&self) -> &Rc<Line2Mesh> {
        &self.mesh
    }

    pub fn num_points(&self) -> usize {
        self.mesh.num_points()
    }

    /// Value at a domain point id.
    pub fn value(&self, did: usize) -> f64 {
        self.values.borrow()[did]
    }

    pub fn set_value(&self, did: usize, value: f64) {
        self.values.borrow_mut()[did] = value;
    }

    /// Borrow all values in did order.
    pub fn values(&self) -> Ref<'_, Vec<f64>> {
        self.values.borrow()
    }

    /// Recompute every value from `(did, x, current)`; the Picard
    /// mechanism for coefficients that depend on other fields.
    pub fn update(&self, f: impl Fn(usize, f64, f64) -> f64) {
        let mut values = self.values.borrow_mut();
        for (did, point) in self.mesh.points().iter().enumerate() {
            values[did] = f(did, point.x, values[did]);
        }
    }

    /// Write `gid,position_x,value` rows in did order.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_point_csv(&self.mesh, &self.values.borrow(), path.as_ref())
    }

    /// Write one timestep of a transient series; `*` in the path is
    /// replaced with the timestep index.
    pub fn write_csv_timestep<P: AsRef<Path>>(&self, pattern: P, timestep: usize) -> Result<()> {
        write_point_csv_timestep(&self.mesh, &self.values.borrow(), pattern.as_ref(), timestep)
    }
}

/// An unknown per-point quantity over one mesh, overwritten by the matrix
/// equation after each solve.
#[derive(Debug)]
pub struct Line2Variable {
    mesh: Rc<Line2Mesh>,
    values: RefCell<Vec<f64>>,
}

impl Line2Variable {
    /// Create with a uniform initial guess at every point.
    pub fn new(mesh: Rc<Line2Mesh>, initial: f64) -> Rc<Self> {
        let values = vec![initial; mesh.num_points()];
        Rc::new(Self {
            mesh,
            values: RefCell::new(values),
        })
    }

    /// Create with an initial guess computed from each point's position.
    pub fn from_fn(mesh: Rc<Line2Mesh>, f: impl Fn(f64) -> f64) -> Rc<Self> {
        let values = mesh.points().iter().map(|p| f(p.x)).collect();
        Rc::new(Self {
            mesh,
            values: RefCell::new(values),
        })
    }

    pub fn mesh(&self) -> &Rc<Line2Mesh> {
        &self.mesh
    }

    pub fn num_points(&self) -> usize {
        self.mesh.num_points()
    }

    /// Value at a domain point id.
    pub fn value(&self, did: usize) -> f64 {
        self.values.borrow()[did]
    }

    pub fn set_value(&self, did: usize, value: f64) {
        self.values.borrow_mut()[did] = value;
    }

    /// Borrow all values in did order.
    pub fn values(&self) -> Ref<'_, Vec<f64>> {
        self.values.borrow()
    }

    /// Write `gid,position_x,value` rows in did order.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_point_csv(&self.mesh, &self.values.borrow(), path.as_ref())
    }

    /// Write one timestep of a transient series; `*` in the path is
    /// replaced with the timestep index.
    pub fn write_csv_timestep<P: AsRef<Path>>(&self, pattern: P, timestep: usize) -> Result<()> {
        write_point_csv_timestep(&self.mesh, &self.values.borrow(), pattern.as_ref(), timestep)
    }
}

fn write_point_csv(mesh: &Line2Mesh, values: &[f64], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "gid,position_x,value")?;
    for (did, point) in mesh.points().iter().enumerate() {
        writeln!(file, "{},{},{}", point.gid, point.x, values[did])?;
    }
    Ok(())
}

fn write_point_csv_timestep(
    mesh: &Line2Mesh,
    values: &[f64],
    pattern: &Path,
    timestep: usize,
) -> Result<()> {
    let pattern = pattern.to_string_lossy();
    let path = pattern.replace('*', &timestep.to_string());
    write_point_csv(mesh, values, Path::new(&path))
}
