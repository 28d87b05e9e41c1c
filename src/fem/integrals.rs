//! Galerkin test-function integrals on line2 elements.
//!
//! For every element the six integral families used by the physics
//! stencils are evaluated with 2-point Gauss quadrature and cached in
//! pre-sized storage. Re-evaluation overwrites in place, so calling an
//! `evaluate_*` method twice cannot duplicate data.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::fem::basis::Line2Basis;
use crate::fem::quadrature::GaussQuadrature;
use crate::mesh::Line2Mesh;

/// Per-element integral store for one mesh.
///
/// `evaluate_derivatives` must run before any integral evaluation; it
/// computes the Jacobians and shape-function values at the quadrature
/// points that every integral shares. Each `evaluate_integral_*` then
/// fills its own array; `evaluate_all` fills everything. Arrays are
/// indexed `[element_did][i]`, `[element_did][i][j]`, or
/// `[element_did][i][j][k]` with local indices in {0, 1}.
#[derive(Debug, Clone)]
pub struct Line2Integrals {
    mesh: Rc<Line2Mesh>,

    // per quadrature point: jacobian[e][l], n[e][l][i], dn_dx[e][l][i]
    jacobian: Vec<[f64; 2]>,
    n: Vec<[[f64; 2]; 2]>,
    dn_dx: Vec<[[f64; 2]; 2]>,

    integral_ni: Vec<[f64; 2]>,
    integral_dni_dx: Vec<[f64; 2]>,
    integral_ni_nj: Vec<[[f64; 2]; 2]>,
    integral_ni_dnj_dx: Vec<[[f64; 2]; 2]>,
    integral_grad_ni_grad_nj: Vec<[[f64; 2]; 2]>,
    integral_ni_nj_dnk_dx: Vec<[[[f64; 2]; 2]; 2]>,
}

impl Line2Integrals {
    pub fn new(mesh: Rc<Line2Mesh>) -> Self {
        Self {
            mesh,
            jacobian: Vec::new(),
            n: Vec::new(),
            dn_dx: Vec::new(),
            integral_ni: Vec::new(),
            integral_dni_dx: Vec::new(),
            integral_ni_nj: Vec::new(),
            integral_ni_dnj_dx: Vec::new(),
            integral_grad_ni_grad_nj: Vec::new(),
            integral_ni_nj_dnk_dx: Vec::new(),
        }
    }

    pub fn mesh(&self) -> &Rc<Line2Mesh> {
        &self.mesh
    }

    /// Evaluate Jacobians, shape functions, and x-derivatives at the
    /// quadrature points of every element.
    ///
    /// # Errors
    /// `DegenerateElement` if any element has coincident nodes (zero
    /// Jacobian determinant), which would otherwise poison the
    /// derivative arrays with non-finite values.
    pub fn evaluate_derivatives(&mut self) -> Result<()> {
        let rule = GaussQuadrature::line2_2point();
        let num_elements = self.mesh.num_elements();

        let mut jacobian = vec![[0.0; 2]; num_elements];
        let mut n = vec![[[0.0; 2]; 2]; num_elements];
        let mut dn_dx = vec![[[0.0; 2]; 2]; num_elements];

        for element_did in 0..num_elements {
            let [x0, x1] = self.mesh.element_endpoints(element_did);
            let j_det = Line2Basis::jacobian_determinant(x0, x1);
            if j_det == 0.0 {
                return Err(Error::DegenerateElement(element_did));
            }

            let dn_da = Line2Basis::shape_derivatives();
            for (l, &a) in rule.points.iter().enumerate() {
                jacobian[element_did][l] = j_det;
                let shape = Line2Basis::shape_functions(a);
                for i in 0..2 {
                    n[element_did][l][i] = shape[i];
                    dn_dx[element_did][l][i] = dn_da[i] / j_det;
                }
            }
        }

        self.jacobian = jacobian;
        self.n = n;
        self.dn_dx = dn_dx;
        Ok(())
    }

    fn require_derivatives(&self) -> Result<()> {
        if self.jacobian.len() != self.mesh.num_elements() {
            return Err(Error::InvalidReference(
                "integrals require evaluate_derivatives() first".to_string(),
            ));
        }
        Ok(())
    }

    /// ∫ N_i over each element.
    pub fn evaluate_integral_ni(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[0.0; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                let mut value = 0.0;
                for l in 0..2 {
                    value += self.jacobian[e][l] * self.n[e][l][i];
                }
                out[e][i] = value;
            }
        }
        self.integral_ni = out;
        Ok(())
    }

    /// ∫ dN_i/dx over each element.
    pub fn evaluate_integral_dni_dx(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[0.0; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                let mut value = 0.0;
                for l in 0..2 {
                    value += self.jacobian[e][l] * self.dn_dx[e][l][i];
                }
                out[e][i] = value;
            }
        }
        self.integral_dni_dx = out;
        Ok(())
    }

    /// ∫ N_i N_j over each element.
    pub fn evaluate_integral_ni_nj(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[[0.0; 2]; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                for j in 0..2 {
                    let mut value = 0.0;
                    for l in 0..2 {
                        value += self.jacobian[e][l] * self.n[e][l][i] * self.n[e][l][j];
                    }
                    out[e][i][j] = value;
                }
            }
        }
        self.integral_ni_nj = out;
        Ok(())
    }

    /// ∫ N_i dN_j/dx over each element.
    pub fn evaluate_integral_ni_dnj_dx(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[[0.0; 2]; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                for j in 0..2 {
                    let mut value = 0.0;
                    for l in 0..2 {
                        value += self.jacobian[e][l] * self.n[e][l][i] * self.dn_dx[e][l][j];
                    }
                    out[e][i][j] = value;
                }
            }
        }
        self.integral_ni_dnj_dx = out;
        Ok(())
    }

    /// ∫ ∇N_i · ∇N_j over each element (the 1D stiffness kernel).
    pub fn evaluate_integral_grad_ni_grad_nj(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[[0.0; 2]; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                for j in 0..2 {
                    let mut value = 0.0;
                    for l in 0..2 {
                        value += self.jacobian[e][l] * self.dn_dx[e][l][i] * self.dn_dx[e][l][j];
                    }
                    out[e][i][j] = value;
                }
            }
        }
        self.integral_grad_ni_grad_nj = out;
        Ok(())
    }

    /// ∫ N_i N_j dN_k/dx over each element.
    pub fn evaluate_integral_ni_nj_dnk_dx(&mut self) -> Result<()> {
        self.require_derivatives()?;
        let num_elements = self.mesh.num_elements();
        let mut out = vec![[[[0.0; 2]; 2]; 2]; num_elements];
        for e in 0..num_elements {
            for i in 0..2 {
                for j in 0..2 {
                    for k in 0..2 {
                        let mut value = 0.0;
                        for l in 0..2 {
                            value += self.jacobian[e][l]
                                * self.n[e][l][i]
                                * self.n[e][l][j]
                                * self.dn_dx[e][l][k];
                        }
                        out[e][i][j][k] = value;
                    }
                }
            }
        }
        self.integral_ni_nj_dnk_dx = out;
        Ok(())
    }

    /// Evaluate derivatives and all six integral families.
    pub fn evaluate_all(&mut self) -> Result<()> {
        self.evaluate_derivatives()?;
        self.evaluate_integral_ni()?;
        self.evaluate_integral_dni_dx()?;
        self.evaluate_integral_ni_nj()?;
        self.evaluate_integral_ni_dnj_dx()?;
        self.evaluate_integral_grad_ni_grad_nj()?;
        self.evaluate_integral_ni_nj_dnk_dx()?;
        Ok(())
    }

    pub fn has_ni(&self) -> bool {
        !self.integral_ni.is_empty()
    }

    pub fn has_dni_dx(&self) -> bool {
        !self.integral_dni_dx.is_empty()
    }

    pub fn has_ni_nj(&self) -> bool {
        !self.integral_ni_nj.is_empty()
    }

    pub fn has_ni_dnj_dx(&self) -> bool {
        !self.integral_ni_dnj_dx.is_empty()
    }

    pub fn has_grad_ni_grad_nj(&self) -> bool {
        !self.integral_grad_ni_grad_nj.is_empty()
    }

    pub fn has_ni_nj_dnk_dx(&self) -> bool {
        !self.integral_ni_nj_dnk_dx.is_empty()
    }

    pub fn ni(&self, element_did: usize, i: usize) -> f64 {
        self.integral_ni[element_did][i]
    }

    pub fn dni_dx(&self, element_did: usize, i: usize) -> f64 {
        self.integral_dni_dx[element_did][i]
    }

    pub fn ni_nj(&self, element_did: usize, i: usize, j: usize) -> f64 {
        self.integral_ni_nj[element_did][i][j]
    }

    pub fn ni_dnj_dx(&self, element_did: usize, i: usize, j: usize) -> f64 {
        self.integral_ni_dnj_dx[element_did][i][j]
    }

    pub fn grad_ni_grad_nj(&self, element_did: usize, i: usize, j: usize) -> f64 {
        self.integral_grad_ni_grad_nj[element_did][i][j]
    }

    pub fn ni_nj_dnk_dx(&self, element_did: usize, i: usize, j: usize, k: usize) -> f64 {
        self.integral_ni_nj_dnk_dx[element_did][i][j][k]
    }
}
