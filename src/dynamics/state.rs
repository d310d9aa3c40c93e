use nalgebra::Vector3;

use crate::error::{OrbitError, Result};
use crate::physics::gravity::{gravitational_parameter, G_KM};

fn check_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidState(format!("{what} must be positive, got {value}")))
    }
}

fn check_vector(what: &str, v: &Vector3<f64>) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(OrbitError::InvalidState(format!("{what} has a non-finite component")))
    }
}

// ---------------------------------------------------------------------------
// Central body
// ---------------------------------------------------------------------------

/// Central mass of an orbit. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    name: String,
    mass: f64,            // kg
    mu: f64,              // km^3/s^2
    radius: Option<f64>,  // km
}

impl Body {
    /// Body whose gravitational parameter is derived as G * mass.
    pub fn from_mass(name: impl Into<String>, mass: f64, radius: Option<f64>) -> Result<Self> {
        Self::validated(name.into(), mass, gravitational_parameter(mass), radius)
    }

    /// Body with a directly supplied gravitational parameter.
    pub fn from_mu(name: impl Into<String>, mu: f64, radius: Option<f64>) -> Result<Self> {
        check_positive("gravitational parameter", mu)?;
        Self::validated(name.into(), mu / G_KM, mu, radius)
    }

    fn validated(name: String, mass: f64, mu: f64, radius: Option<f64>) -> Result<Self> {
        check_positive("body mass", mass)?;
        check_positive("gravitational parameter", mu)?;
        if let Some(r) = radius {
            if !r.is_finite() || r < 0.0 {
                return Err(OrbitError::InvalidState(format!(
                    "body radius must be non-negative, got {r}"
                )));
            }
        }
        Ok(Self { name, mass, mu, radius })
    }

    /// Unchecked constructor for compile-time constant tables.
    pub(crate) fn from_parts(name: &str, mass: f64, mu: f64, radius: Option<f64>) -> Self {
        Self { name: name.to_string(), mass, mu, radius }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    /// Radius that altitudes are measured from (0 for a point mass).
    pub fn surface_radius(&self) -> f64 {
        self.radius.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Particle: orbiting object state, body-centred
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    name: String,
    mass: f64,                // kg
    pos: Vector3<f64>,        // km
    vel: Vector3<f64>,        // km/s
    acc: Vector3<f64>,        // km/s^2
    radius: Option<f64>,      // km
    validity: Option<f64>,    // max distance from the center the state is trusted at, km
}

impl Particle {
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        acc: Vector3<f64>,
    ) -> Result<Self> {
        ParticleBuilder::new(name)
            .mass(mass)
            .position(pos)
            .velocity(vel)
            .acceleration(acc)
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.pos
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.vel
    }

    pub fn acceleration(&self) -> &Vector3<f64> {
        &self.acc
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn validity(&self) -> Option<f64> {
        self.validity
    }

    /// Copy of this particle carrying a different kinematic state.
    pub fn with_state(
        &self,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        acc: Vector3<f64>,
    ) -> Result<Self> {
        check_vector("position", &pos)?;
        check_vector("velocity", &vel)?;
        check_vector("acceleration", &acc)?;
        Ok(Self { pos, vel, acc, ..self.clone() })
    }
}

// ---------------------------------------------------------------------------
// Particle builder
// ---------------------------------------------------------------------------

pub struct ParticleBuilder {
    name: String,
    mass: f64,
    pos: Vector3<f64>,
    vel: Vector3<f64>,
    acc: Vector3<f64>,
    radius: Option<f64>,
    validity: Option<f64>,
}

impl ParticleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1.0,
            pos: Vector3::zeros(),
            vel: Vector3::zeros(),
            acc: Vector3::zeros(),
            radius: None,
            validity: None,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn position(mut self, v: Vector3<f64>) -> Self { self.pos = v; self }
    pub fn velocity(mut self, v: Vector3<f64>) -> Self { self.vel = v; self }
    pub fn acceleration(mut self, v: Vector3<f64>) -> Self { self.acc = v; self }
    pub fn radius(mut self, v: f64) -> Self { self.radius = Some(v); self }
    pub fn validity(mut self, v: f64) -> Self { self.validity = Some(v); self }

    pub fn build(self) -> Result<Particle> {
        check_positive("particle mass", self.mass)?;
        check_vector("position", &self.pos)?;
        check_vector("velocity", &self.vel)?;
        check_vector("acceleration", &self.acc)?;
        if let Some(r) = self.radius {
            if !r.is_finite() || r < 0.0 {
                return Err(OrbitError::InvalidState(format!(
                    "particle radius must be non-negative, got {r}"
                )));
            }
        }
        if let Some(bound) = self.validity {
            check_positive("validity bound", bound)?;
        }
        Ok(Particle {
            name: self.name,
            mass: self.mass,
            pos: self.pos,
            vel: self.vel,
            acc: self.acc,
            radius: self.radius,
            validity: self.validity,
        })
    }
}
