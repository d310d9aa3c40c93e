//! Universal-variable Kepler equation.
//!
//! The universal anomaly χ is found by Newton-Raphson iteration on
//!
//! ```text
//! F(χ) = (r0 v_r0 / √μ) χ² C(z) + (1 - α r0) χ³ S(z) + r0 χ - √μ Δt,   z = α χ²
//! ```
//!
//! which covers ellipses (α > 0), parabolas (α = 0) and hyperbolas (α < 0)
//! with one formula.

use log::{debug, trace, warn};

use crate::config::KeplerConfig;
use crate::error::{OrbitError, Result};

// ---------------------------------------------------------------------------
// Stumpff functions
// ---------------------------------------------------------------------------

/// Stumpff function C(z).
pub fn stumpff_c(z: f64) -> f64 {
    if z > 0.0 {
        (1.0 - z.sqrt().cos()) / z
    } else if z < 0.0 {
        ((-z).sqrt().cosh() - 1.0) / -z
    } else {
        0.5
    }
}

/// Stumpff function S(z).
pub fn stumpff_s(z: f64) -> f64 {
    if z > 0.0 {
        let sz = z.sqrt();
        (sz - sz.sin()) / sz.powi(3)
    } else if z < 0.0 {
        let sz = (-z).sqrt();
        (sz.sinh() - sz) / sz.powi(3)
    } else {
        1.0 / 6.0
    }
}

// ---------------------------------------------------------------------------
// Root finder
// ---------------------------------------------------------------------------

/// Converged universal anomaly together with solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub chi: f64,          // universal anomaly, km^0.5
    pub z: f64,            // alpha * chi^2
    pub iterations: usize,
    pub dt: f64,           // s, time of flight solved for
}

/// Inputs of the universal Kepler equation at the epoch state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerProblem {
    pub mu: f64,     // km^3/s^2
    pub alpha: f64,  // 1/a, 1/km
    pub r0: f64,     // km
    pub vr0: f64,    // km/s
}

impl KeplerProblem {
    fn residual(&self, chi: f64, dt: f64) -> (f64, f64, f64) {
        let sqrt_mu = self.mu.sqrt();
        let z = self.alpha * chi * chi;
        let c = stumpff_c(z);
        let s = stumpff_s(z);
        let k = self.r0 * self.vr0 / sqrt_mu;
        let one_minus = 1.0 - self.alpha * self.r0;

        let f = k * chi * chi * c + one_minus * chi.powi(3) * s + self.r0 * chi - sqrt_mu * dt;
        let f_prime = k * chi * (1.0 - self.alpha * chi * chi * s)
            + one_minus * chi * chi * c
            + self.r0;
        (z, f, f_prime)
    }

    /// Solve for the universal anomaly after `dt` seconds (negative runs backwards).
    ///
    /// The iteration cap is always enforced. Hitting it yields
    /// [`OrbitError::MaxIterationsExceeded`] with the last estimate; a
    /// non-finite Newton step stops immediately with
    /// [`OrbitError::NonFiniteStep`].
    pub fn solve(&self, dt: f64, config: &KeplerConfig) -> Result<KeplerSolution> {
        config.validate()?;
        if !dt.is_finite() {
            return Err(OrbitError::InvalidState(format!("time of flight must be finite, got {dt}")));
        }

        let mut chi = self.mu.sqrt() * self.alpha.abs() * dt;

        for iteration in 1..=config.max_iterations {
            let (z, f, f_prime) = self.residual(chi, dt);
            let ratio = f / f_prime;
            trace!("kepler iter {iteration}: chi={chi} z={z} F={f} F'={f_prime}");

            if !ratio.is_finite() {
                warn!("kepler step non-finite at iteration {iteration} (chi={chi}, F'={f_prime})");
                return Err(OrbitError::NonFiniteStep { chi, iterations: iteration });
            }

            chi -= ratio;

            if ratio.abs() < config.tolerance {
                debug!("kepler converged in {iteration} iterations: chi={chi}");
                return Ok(KeplerSolution {
                    chi,
                    z: self.alpha * chi * chi,
                    iterations: iteration,
                    dt,
                });
            }
        }

        warn!(
            "kepler solver hit the {} iteration cap (chi={chi})",
            config.max_iterations
        );
        Err(OrbitError::MaxIterationsExceeded { chi, iterations: config.max_iterations })
    }
}

/// Universal anomaly for a state with radius `r0`, radial velocity `vr0`
/// and reciprocal semimajor axis `alpha`, after `dt` seconds.
pub fn universal_anomaly(
    mu: f64,
    alpha: f64,
    r0: f64,
    vr0: f64,
    dt: f64,
    config: &KeplerConfig,
) -> Result<KeplerSolution> {
    KeplerProblem { mu, alpha, r0, vr0 }.solve(dt, config)
}
