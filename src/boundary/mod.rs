pub mod io;

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::mesh::Line2Mesh;

/// Boundary condition kind, used when registering configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Dirichlet,
    Neumann,
    Robin,
}

impl BoundaryKind {
    /// Parse a kind from its config-file spelling.
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "dirichlet" => Ok(BoundaryKind::Dirichlet),
            "neumann" => Ok(BoundaryKind::Neumann),
            "robin" => Ok(BoundaryKind::Robin),
            _ => Err(Error::InvalidReference(format!(
                "unknown boundary condition kind '{}'",
                s
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryKind::Dirichlet => "dirichlet",
            BoundaryKind::Neumann => "neumann",
            BoundaryKind::Robin => "robin",
        }
    }

    fn parameter_count(&self) -> usize {
        match self {
            BoundaryKind::Dirichlet | BoundaryKind::Neumann => 1,
            BoundaryKind::Robin => 2,
        }
    }
}

/// A registered boundary condition with its typed parameters.
///
/// Robin conditions prescribe a flux `constant + coefficient * u`; the
/// sign with which `coefficient` enters the system matrix depends on the
/// physics (steady subtracts it, transient adds it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryConfig {
    Dirichlet { value: f64 },
    Neumann { flux: f64 },
    Robin { constant: f64, coefficient: f64 },
}

impl BoundaryConfig {
    /// Build a config from a kind and a parameter slice, validating arity.
    pub fn new(kind: BoundaryKind, params: &[f64]) -> Result<Self> {
        let expected = kind.parameter_count();
        if params.len() != expected {
            return Err(Error::BoundaryParameterArity {
                kind: kind.name(),
                expected,
                got: params.len(),
            });
        }
        Ok(match kind {
            BoundaryKind::Dirichlet => BoundaryConfig::Dirichlet { value: params[0] },
            BoundaryKind::Neumann => BoundaryConfig::Neumann { flux: params[0] },
            BoundaryKind::Robin => BoundaryConfig::Robin {
                constant: params[0],
                coefficient: params[1],
            },
        })
    }

    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryConfig::Dirichlet { .. } => BoundaryKind::Dirichlet,
            BoundaryConfig::Neumann { .. } => BoundaryKind::Neumann,
            BoundaryConfig::Robin { .. } => BoundaryKind::Robin,
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match *self {
            BoundaryConfig::Dirichlet { value } => vec![value],
            BoundaryConfig::Neumann { flux } => vec![flux],
            BoundaryConfig::Robin {
                constant,
                coefficient,
            } => vec![constant, coefficient],
        }
    }
}

/// One boundary entry: an element, the local point (0 or 1) it applies
/// to, and the id of the config describing the condition.
///
/// `local_point == None` encodes the `-1` sentinel of the input format:
/// the entry is kept for alignment but skipped during application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryElement {
    pub element_gid: usize,
    pub local_point: Option<usize>,
    pub config_id: usize,
}

/// Boundary data for one mesh: flux-type and value-type element lists
/// plus the registered configuration table.
///
/// An element may appear in both lists; flux contributions on a point
/// that also carries a value condition are erased by the row-zeroing
/// pass during assembly.
#[derive(Debug, Clone)]
pub struct Line2Boundary {
    mesh: Rc<Line2Mesh>,
    flux_elements: Vec<BoundaryElement>,
    value_elements: Vec<BoundaryElement>,
    configs: Vec<Option<BoundaryConfig>>,
}

impl Line2Boundary {
    /// Build boundary data from element lists.
    ///
    /// Element gids are checked against the mesh; configurations are
    /// registered afterwards with [`set_boundary_condition`].
    ///
    /// [`set_boundary_condition`]: Line2Boundary::set_boundary_condition
    pub fn new(
        mesh: Rc<Line2Mesh>,
        flux_elements: Vec<BoundaryElement>,
        value_elements: Vec<BoundaryElement>,
    ) -> Result<Self> {
        let mut num_configs = 0;
        for entry in flux_elements.iter().chain(value_elements.iter()) {
            if mesh.element_did(entry.element_gid).is_none() {
                return Err(Error::InvalidReference(format!(
                    "boundary references element gid {} not present in mesh",
                    entry.element_gid
                )));
            }
            if let Some(lid) = entry.local_point {
                if lid > 1 {
                    return Err(Error::InvalidReference(format!(
                        "boundary local point id {} out of range for line2",
                        lid
                    )));
                }
            }
            num_configs = num_configs.max(entry.config_id + 1);
        }

        Ok(Self {
            mesh,
            flux_elements,
            value_elements,
            configs: vec![None; num_configs],
        })
    }

    /// Register the boundary condition for a config id referenced by the
    /// element lists. Parameter arity is validated here, not at assembly.
    pub fn set_boundary_condition(
        &mut self,
        id: usize,
        kind: BoundaryKind,
        params: &[f64],
    ) -> Result<()> {
        let config = BoundaryConfig::new(kind, params)?;
        if id >= self.configs.len() {
            self.configs.resize(id + 1, None);
        }
        self.configs[id] = Some(config);
        Ok(())
    }

    pub fn mesh(&self) -> &Rc<Line2Mesh> {
        &self.mesh
    }

    pub fn flux_elements(&self) -> &[BoundaryElement] {
        &self.flux_elements
    }

    pub fn value_elements(&self) -> &[BoundaryElement] {
        &self.value_elements
    }

    /// The registered config for an id, if any.
    pub fn config(&self, id: usize) -> Option<&BoundaryConfig> {
        self.configs.get(id).and_then(|c| c.as_ref())
    }

    /// Check that every config id referenced by an element list has been
    /// registered. Called by physics constructors.
    pub fn validate_configs(&self) -> Result<()> {
        for entry in self.flux_elements.iter().chain(self.value_elements.iter()) {
            if self.config(entry.config_id).is_none() {
                return Err(Error::InvalidReference(format!(
                    "boundary config id {} referenced but never registered",
                    entry.config_id
                )));
            }
        }
        Ok(())
    }
}
