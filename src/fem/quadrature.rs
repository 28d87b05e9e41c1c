/// Gaussian quadrature rules for line elements on the reference
/// interval [-1, 1]
pub struct GaussQuadrature {
    /// Integration point coordinates in the reference interval
    pub points: Vec<f64>,
    /// Integration weights
    pub weights: Vec<f64>,
}

impl GaussQuadrature {
    /// 2-point Gauss-Legendre rule (degree 3 exactness)
    ///
    /// Exact for cubic polynomials; sufficient for every line2 integral
    /// assembled here (the highest-order integrand, Ni*Nj*dNk/dx, is
    /// quadratic in the reference coordinate).
    pub fn line2_2point() -> Self {
        let a = 1.0 / 3.0_f64.sqrt();
        Self {
            points: vec![-a, a],
            weights: vec![1.0, 1.0],
        }
    }

    /// Get the number of integration points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum() {
        // Weights should sum to the reference interval length (2)
        let rule = GaussQuadrature::line2_2point();
        let sum: f64 = rule.weights.iter().sum();
        assert_relative_eq!(sum, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_points_symmetric() {
        let rule = GaussQuadrature::line2_2point();
        assert_eq!(rule.num_points(), 2);
        assert_relative_eq!(rule.points[0], -rule.points[1], epsilon = 1e-14);
    }

    #[test]
    fn test_polynomial_exactness() {
        // ∫ a^2 da over [-1, 1] = 2/3
        let rule = GaussQuadrature::line2_2point();
        let mut integral = 0.0;
        for (point, weight) in rule.points.iter().zip(rule.weights.iter()) {
            integral += point * point * weight;
        }
        assert_relative_eq!(integral, 2.0 / 3.0, epsilon = 1e-14);

        // cubic terms vanish by symmetry
        let mut cubic = 0.0;
        for (point, weight) in rule.points.iter().zip(rule.weights.iter()) {
            cubic += point.powi(3) * weight;
        }
        assert_relative_eq!(cubic, 0.0, epsilon = 1e-14);
    }
}
