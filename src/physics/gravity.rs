use nalgebra::Vector3;

use crate::dynamics::state::Body;

// ---------------------------------------------------------------------------
// Constants (km, kg, s)
// ---------------------------------------------------------------------------

/// Newtonian constant of gravitation, km^3 / (kg s^2).
pub const G_KM: f64 = 6.674_30e-20;

pub const MU_EARTH: f64 = 398_600.0;     // km^3/s^2
pub const R_EARTH: f64 = 6_378.0;        // equatorial radius, km
pub const M_EARTH: f64 = 5.972e24;       // kg

/// Gravitational parameter of a body of the given mass.
pub fn gravitational_parameter(mass: f64) -> f64 {
    G_KM * mass
}

/// Reference Earth used by demos and tests.
pub fn earth() -> Body {
    // Constants are valid by construction.
    Body::from_parts("Earth", M_EARTH, MU_EARTH, Some(R_EARTH))
}

/// Point-mass gravitational acceleration at `pos` (km/s^2), body at the origin.
pub fn gravity_pointmass(mu: f64, pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    if r <= 0.0 {
        return Vector3::zeros();
    }
    -mu / (r * r * r) * pos
}
