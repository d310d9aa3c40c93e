use nalgebra::Vector3;

use super::kepler::{stumpff_c, stumpff_s, KeplerSolution};

/// Lagrange coefficients f, g, f-dot, g-dot for one time of flight.
///
/// The propagated state is a linear combination of the epoch state:
/// r = f r0 + g v0, v = f_dot r0 + g_dot v0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagrangeCoefficients {
    pub f: f64,
    pub g: f64,       // s
    pub f_dot: f64,   // 1/s
    pub g_dot: f64,
}

impl LagrangeCoefficients {
    /// Coefficients from a solved universal anomaly and the epoch state.
    pub fn new(
        mu: f64,
        pos0: &Vector3<f64>,
        vel0: &Vector3<f64>,
        solution: &KeplerSolution,
    ) -> Self {
        let KeplerSolution { chi, z, dt, .. } = *solution;
        let sqrt_mu = mu.sqrt();
        let r0 = pos0.norm();
        let c = stumpff_c(z);
        let s = stumpff_s(z);

        let f = 1.0 - chi * chi / r0 * c;
        let g = dt - chi.powi(3) / sqrt_mu * s;

        let r = (f * pos0 + g * vel0).norm();

        let f_dot = sqrt_mu / (r0 * r) * chi * (z * s - 1.0);
        let g_dot = 1.0 - chi * chi / r * c;

        LagrangeCoefficients { f, g, f_dot, g_dot }
    }

    pub fn position(&self, pos0: &Vector3<f64>, vel0: &Vector3<f64>) -> Vector3<f64> {
        self.f * pos0 + self.g * vel0
    }

    pub fn velocity(&self, pos0: &Vector3<f64>, vel0: &Vector3<f64>) -> Vector3<f64> {
        self.f_dot * pos0 + self.g_dot * vel0
    }

    /// Propagated (position, velocity). The inputs are left untouched.
    pub fn apply(&self, pos0: &Vector3<f64>, vel0: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        (self.position(pos0, vel0), self.velocity(pos0, vel0))
    }

    /// f g-dot - f-dot g, identically 1 for exact two-body motion.
    pub fn wronskian(&self) -> f64 {
        self.f * self.g_dot - self.f_dot * self.g
    }
}
