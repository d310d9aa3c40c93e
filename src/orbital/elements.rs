use nalgebra::Vector3;

use crate::error::{DegenerateQuantity, OrbitError, Result};

/// Magnitudes below this (relative to their natural scale) count as zero.
pub const DEGENERACY_EPS: f64 = 1e-10;

/// `acos` in degrees, argument clamped against round-off.
fn acos_deg(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Resolve the acos quadrant ambiguity: `360 - angle` when the signed
/// discriminating component is negative. Result lies in [0, 360).
fn quadrant(angle: f64, negative: bool) -> f64 {
    let deg = if negative { 360.0 - angle } else { angle };
    if deg >= 360.0 { deg - 360.0 } else { deg }
}

/// Classical orbital elements of a body-centred state (r, v) under μ.
///
/// Computed once from the state and cached. All angles are in degrees;
/// inclination lies in [0, 180], the others in [0, 360). Angles whose
/// defining direction vanishes (equatorial node line, circular
/// eccentricity vector) are reported as [`OrbitError::Degenerate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    mu: f64,
    h: Vector3<f64>,         // angular momentum, km^2/s
    node: Vector3<f64>,      // node line, km^2/s
    ecc_vec: Vector3<f64>,   // eccentricity vector
    ecc: f64,
    radial_velocity: f64,    // km/s
    inc: f64,                // deg
    raan: Option<f64>,       // deg
    argp: Option<f64>,       // deg
    true_anom: Option<f64>,  // deg
    perigee: f64,            // km
    apogee: f64,             // km
    sma: f64,                // km
}

impl OrbitalElements {
    /// Compute the element set from a state vector.
    pub fn from_state(pos: &Vector3<f64>, vel: &Vector3<f64>, mu: f64) -> Result<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(OrbitError::InvalidState(format!(
                "gravitational parameter must be positive, got {mu}"
            )));
        }
        let r = pos.norm();
        let v = vel.norm();
        if r <= 0.0 {
            return Err(OrbitError::InvalidState("position coincides with the center".into()));
        }
        if v <= 0.0 {
            return Err(OrbitError::InvalidState("velocity is zero".into()));
        }

        let h = pos.cross(vel);
        let h_mag = h.norm();
        if h_mag <= DEGENERACY_EPS * r * v {
            return Err(OrbitError::Degenerate(DegenerateQuantity::AngularMomentum));
        }

        let node = Vector3::z().cross(&h);
        let node_mag = node.norm();

        let ecc_vec = (vel.cross(&h) - pos * (mu / r)) / mu;
        let ecc = ecc_vec.norm();

        let radial_velocity = vel.dot(pos) / r;

        let inc = acos_deg(h.z / h_mag);

        let has_node = node_mag > DEGENERACY_EPS * h_mag;
        let has_perigee = ecc > DEGENERACY_EPS;

        let raan = has_node.then(|| quadrant(acos_deg(node.x / node_mag), node.y < 0.0));

        let argp = (has_node && has_perigee).then(|| {
            let cos_argp = node.dot(&ecc_vec) / (node_mag * ecc);
            quadrant(acos_deg(cos_argp), ecc_vec.z < 0.0)
        });

        let true_anom = has_perigee.then(|| {
            let cos_nu = ecc_vec.dot(pos) / (ecc * r);
            quadrant(acos_deg(cos_nu), radial_velocity < 0.0)
        });

        // Orbit equation at nu = 0 and nu = pi.
        let p = h_mag * h_mag / mu;
        let perigee = p / (1.0 + ecc * 0.0_f64.cos());
        let apogee = p / (1.0 + ecc * std::f64::consts::PI.cos());
        let sma = 0.5 * (perigee + apogee);

        Ok(OrbitalElements {
            mu,
            h,
            node,
            ecc_vec,
            ecc,
            radial_velocity,
            inc,
            raan,
            argp,
            true_anom,
            perigee,
            apogee,
            sma,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// h = r x v.
    pub fn angular_vector(&self) -> Vector3<f64> {
        self.h
    }

    pub fn angular_momentum(&self) -> f64 {
        self.h.norm()
    }

    /// n = k x h.
    pub fn node_line(&self) -> Vector3<f64> {
        self.node
    }

    pub fn right_ascension(&self) -> Result<f64> {
        self.raan
            .ok_or(OrbitError::Degenerate(DegenerateQuantity::NodeLine))
    }

    pub fn eccentricity_vector(&self) -> Vector3<f64> {
        self.ecc_vec
    }

    pub fn eccentricity(&self) -> f64 {
        self.ecc
    }

    pub fn radial_velocity(&self) -> f64 {
        self.radial_velocity
    }

    pub fn perigee_argument(&self) -> Result<f64> {
        self.argp.ok_or_else(|| {
            let missing = if self.raan.is_none() {
                DegenerateQuantity::NodeLine
            } else {
                DegenerateQuantity::EccentricityVector
            };
            OrbitError::Degenerate(missing)
        })
    }

    pub fn true_anomaly(&self) -> Result<f64> {
        self.true_anom
            .ok_or(OrbitError::Degenerate(DegenerateQuantity::EccentricityVector))
    }

    pub fn inclination(&self) -> f64 {
        self.inc
    }

    /// Perigee radius, km.
    pub fn perigee(&self) -> f64 {
        self.perigee
    }

    /// Apogee radius, km. Negative for hyperbolas, infinite for parabolas.
    pub fn apogee(&self) -> f64 {
        self.apogee
    }

    pub fn semimajor_axis(&self) -> f64 {
        self.sma
    }

    pub fn is_bound(&self) -> bool {
        self.sma.is_finite() && self.sma > 0.0
    }

    /// Orbital period (s). Only defined for elliptical orbits.
    pub fn period(&self) -> Result<f64> {
        if !self.is_bound() {
            return Err(OrbitError::Unbounded { semimajor_axis: self.sma });
        }
        Ok(2.0 * std::f64::consts::PI * self.sma.powf(1.5) / self.mu.sqrt())
    }
}
