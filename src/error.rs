use std::fmt;

use thiserror::Error;

/// Quantity whose vanishing magnitude leaves an element undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateQuantity {
    /// Equatorial orbit: no ascending node.
    NodeLine,
    /// Circular orbit: no perigee direction.
    EccentricityVector,
    /// Rectilinear motion: position parallel to velocity.
    AngularMomentum,
}

impl fmt::Display for DegenerateQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegenerateQuantity::NodeLine => "node line",
            DegenerateQuantity::EccentricityVector => "eccentricity vector",
            DegenerateQuantity::AngularMomentum => "angular momentum",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("degenerate orbit: {0} is zero")]
    Degenerate(DegenerateQuantity),
    #[error("orbit is not bounded (semimajor axis {semimajor_axis} km)")]
    Unbounded { semimajor_axis: f64 },
    #[error("universal anomaly did not converge in {iterations} iterations (last estimate {chi})")]
    MaxIterationsExceeded { chi: f64, iterations: usize },
    #[error("universal anomaly step became non-finite after {iterations} iterations (last estimate {chi})")]
    NonFiniteStep { chi: f64, iterations: usize },
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OrbitError>;
