use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;

use super::elements::OrbitalElements;
use super::kepler::{KeplerProblem, KeplerSolution};
use super::lagrange::LagrangeCoefficients;
use crate::config::KeplerConfig;
use crate::dynamics::state::{Body, Particle};
use crate::error::{OrbitError, Result};
use crate::physics::gravity::gravity_pointmass;

/// Upper bound on the number of samples a single ephemeris may hold.
pub const MAX_EPHEMERIS_SAMPLES: usize = 10_000_000;

/// One sample of a propagated trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisSample {
    pub time: f64,              // s since epoch
    pub pos: Vector3<f64>,      // km
    pub vel: Vector3<f64>,      // km/s
}

impl EphemerisSample {
    pub fn altitude(&self, body: &Body) -> f64 {
        self.pos.norm() - body.surface_radius()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// Two-body orbit of a satellite around a central body.
///
/// Body and satellite are shared, never owned exclusively; the element set
/// is computed once at construction since the epoch state is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    body: Arc<Body>,
    satellite: Arc<Particle>,
    elements: OrbitalElements,
}

impl Orbit {
    /// Orbit from the satellite's body-centred state vectors.
    pub fn new(body: Arc<Body>, satellite: Arc<Particle>) -> Result<Self> {
        let pos = satellite.position();
        let vel = satellite.velocity();
        let r = pos.norm();
        if r <= 0.0 {
            return Err(OrbitError::InvalidState(format!(
                "{} coincides with the center of {}",
                satellite.name(),
                body.name()
            )));
        }
        if vel.norm() <= 0.0 {
            return Err(OrbitError::InvalidState(format!("{} has zero velocity", satellite.name())));
        }
        if let Some(bound) = satellite.validity() {
            if r > bound {
                return Err(OrbitError::InvalidState(format!(
                    "{} is {r} km from the center, beyond its validity bound of {bound} km",
                    satellite.name()
                )));
            }
        }
        let elements = OrbitalElements::from_state(pos, vel, body.mu())?;
        Ok(Self { body, satellite, elements })
    }

    /// Orbit with the given perigee and apogee altitudes above the body's surface.
    ///
    /// The satellite is placed at perigee on the +x axis moving along +y
    /// (equatorial, prograde). Its name, mass, radius and validity bound are
    /// kept; its state is replaced. The altitudes may be given in either order.
    pub fn from_altitudes(
        body: Arc<Body>,
        satellite: &Particle,
        perigee_altitude: f64,
        apogee_altitude: f64,
    ) -> Result<Self> {
        let (low, high) = if perigee_altitude <= apogee_altitude {
            (perigee_altitude, apogee_altitude)
        } else {
            (apogee_altitude, perigee_altitude)
        };
        let rp = body.surface_radius() + low;
        let ra = body.surface_radius() + high;
        if !rp.is_finite() || !ra.is_finite() || rp <= 0.0 {
            return Err(OrbitError::InvalidState(format!(
                "apsis altitudes {low} km / {high} km lie inside the center of {}",
                body.name()
            )));
        }

        let mu = body.mu();
        let h = (2.0 * mu * rp * ra / (rp + ra)).sqrt();
        let pos = Vector3::new(rp, 0.0, 0.0);
        let vel = Vector3::new(0.0, h / rp, 0.0);
        let synthesized = satellite.with_state(pos, vel, gravity_pointmass(mu, &pos))?;

        debug!(
            "orbit of {} around {} from altitudes {low}..{high} km (h={h})",
            satellite.name(),
            body.name()
        );
        Self::new(body, Arc::new(synthesized))
    }

    pub fn body(&self) -> &Arc<Body> {
        &self.body
    }

    pub fn satellite(&self) -> &Arc<Particle> {
        &self.satellite
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    // -----------------------------------------------------------------------
    // Element queries
    // -----------------------------------------------------------------------

    pub fn angular_vector(&self) -> Vector3<f64> {
        self.elements.angular_vector()
    }

    pub fn node_line(&self) -> Vector3<f64> {
        self.elements.node_line()
    }

    pub fn right_ascension(&self) -> Result<f64> {
        self.elements.right_ascension()
    }

    pub fn eccentricity_vector(&self) -> Vector3<f64> {
        self.elements.eccentricity_vector()
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity()
    }

    pub fn radial_velocity(&self) -> f64 {
        self.elements.radial_velocity()
    }

    pub fn perigee_argument(&self) -> Result<f64> {
        self.elements.perigee_argument()
    }

    pub fn true_anomaly(&self) -> Result<f64> {
        self.elements.true_anomaly()
    }

    pub fn inclination(&self) -> f64 {
        self.elements.inclination()
    }

    pub fn perigee(&self) -> f64 {
        self.elements.perigee()
    }

    pub fn apogee(&self) -> f64 {
        self.elements.apogee()
    }

    pub fn semimajor_axis(&self) -> f64 {
        self.elements.semimajor_axis()
    }

    pub fn period(&self) -> Result<f64> {
        self.elements.period()
    }

    pub fn perigee_altitude(&self) -> f64 {
        self.perigee() - self.body.surface_radius()
    }

    pub fn apogee_altitude(&self) -> f64 {
        self.apogee() - self.body.surface_radius()
    }

    /// Distance between satellite and body center, km.
    pub fn distance(&self) -> f64 {
        self.satellite.position().norm()
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    fn kepler_problem(&self) -> KeplerProblem {
        KeplerProblem {
            mu: self.body.mu(),
            alpha: 1.0 / self.semimajor_axis(),
            r0: self.distance(),
            vr0: self.radial_velocity(),
        }
    }

    /// Universal anomaly after `dt` seconds with the default solver settings.
    pub fn universal_anomaly(&self, dt: f64) -> Result<KeplerSolution> {
        self.universal_anomaly_with(dt, &KeplerConfig::default())
    }

    pub fn universal_anomaly_with(&self, dt: f64, config: &KeplerConfig) -> Result<KeplerSolution> {
        self.kepler_problem().solve(dt, config)
    }

    pub fn lagrangian(&self, dt: f64) -> Result<LagrangeCoefficients> {
        self.lagrangian_with(dt, &KeplerConfig::default())
    }

    pub fn lagrangian_with(&self, dt: f64, config: &KeplerConfig) -> Result<LagrangeCoefficients> {
        let solution = self.universal_anomaly_with(dt, config)?;
        Ok(LagrangeCoefficients::new(
            self.body.mu(),
            self.satellite.position(),
            self.satellite.velocity(),
            &solution,
        ))
    }

    /// Position and velocity `dt` seconds after epoch.
    pub fn state_at(&self, dt: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        self.state_at_with(dt, &KeplerConfig::default())
    }

    pub fn state_at_with(
        &self,
        dt: f64,
        config: &KeplerConfig,
    ) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let coeffs = self.lagrangian_with(dt, config)?;
        Ok(coeffs.apply(self.satellite.position(), self.satellite.velocity()))
    }

    /// New satellite particle at `dt`; this orbit's satellite is untouched.
    pub fn propagate(&self, dt: f64) -> Result<Particle> {
        self.propagate_with(dt, &KeplerConfig::default())
    }

    pub fn propagate_with(&self, dt: f64, config: &KeplerConfig) -> Result<Particle> {
        let (pos, vel) = self.state_at_with(dt, config)?;
        let acc = gravity_pointmass(self.body.mu(), &pos);
        self.satellite.with_state(pos, vel, acc)
    }

    /// Orbit around the same body with the epoch moved by `dt`.
    pub fn propagated(&self, dt: f64) -> Result<Orbit> {
        let particle = self.propagate(dt)?;
        Orbit::new(Arc::clone(&self.body), Arc::new(particle))
    }

    /// States sampled every `step` seconds from epoch through `duration`.
    pub fn ephemeris(&self, step: f64, duration: f64) -> Result<Vec<EphemerisSample>> {
        self.ephemeris_with(step, duration, &KeplerConfig::default())
    }

    pub fn ephemeris_with(
        &self,
        step: f64,
        duration: f64,
        config: &KeplerConfig,
    ) -> Result<Vec<EphemerisSample>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(OrbitError::InvalidState(format!("sample step must be positive, got {step}")));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(OrbitError::InvalidState(format!(
                "ephemeris duration must be non-negative, got {duration}"
            )));
        }

        let ratio = (duration / step).floor();
        if ratio >= MAX_EPHEMERIS_SAMPLES as f64 {
            return Err(OrbitError::InvalidState(format!(
                "ephemeris of {duration} s at {step} s steps exceeds {MAX_EPHEMERIS_SAMPLES} samples"
            )));
        }
        let n_steps = ratio as usize;
        let mut samples = Vec::with_capacity(n_steps + 1);
        for i in 0..=n_steps {
            let time = i as f64 * step;
            let (pos, vel) = self.state_at_with(time, config)?;
            samples.push(EphemerisSample { time, pos, vel });
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::ParticleBuilder;
    use crate::error::DegenerateQuantity;
    use crate::physics::gravity::{earth, R_EARTH};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_orbit() -> Orbit {
        let body = Arc::new(Body::from_mu("Earth", 398_600.0, Some(6378.0)).unwrap());
        let satellite = ParticleBuilder::new("Satellite")
            .mass(1000.0)
            .position(Vector3::new(1600.0, 5310.0, 3800.0))
            .velocity(Vector3::new(-7.350, 0.460, 2.470))
            .build()
            .unwrap();
        Orbit::new(body, Arc::new(satellite)).unwrap()
    }

    fn spacecraft() -> Particle {
        ParticleBuilder::new("Spacecraft").mass(2000.0).validity(1.0e9).build().unwrap()
    }

    #[test]
    fn regression_elements_through_orbit() {
        let orbit = reference_orbit();
        assert_relative_eq!(orbit.eccentricity(), 0.017_661_572_86, max_relative = 1e-8);
        assert_relative_eq!(orbit.inclination(), 40.404_803_94, max_relative = 1e-9);
        assert_relative_eq!(orbit.semimajor_axis(), 6_843.333_815, max_relative = 1e-9);
        assert_relative_eq!(orbit.period().unwrap(), 5_633.947_673, max_relative = 1e-9);
        assert_relative_eq!(orbit.distance(), Vector3::new(1600.0, 5310.0, 3800.0).norm());
    }

    #[test]
    fn one_hour_propagation_regression() {
        let orbit = reference_orbit();
        let sol = orbit.universal_anomaly(3600.0).unwrap();
        assert_relative_eq!(sol.chi, 330.844_639_39, max_relative = 1e-9);
        let (pos, vel) = orbit.state_at(3600.0).unwrap();
        assert_relative_eq!(pos, Vector3::new(3788.786_164, -3936.494_412, -4239.286_281), max_relative = 1e-8);
        assert_relative_eq!(vel, Vector3::new(6.040_752_335, 4.219_058_954, 1.655_813_031), max_relative = 1e-8);
    }

    #[test]
    fn zero_time_returns_epoch_state() {
        let orbit = reference_orbit();
        let (pos, vel) = orbit.state_at(0.0).unwrap();
        assert_relative_eq!(pos, *orbit.satellite().position(), max_relative = 1e-12);
        assert_relative_eq!(vel, *orbit.satellite().velocity(), max_relative = 1e-12);
    }

    #[test]
    fn one_period_returns_epoch_state() {
        let orbit = reference_orbit();
        let period = orbit.period().unwrap();
        let (pos, vel) = orbit.state_at(period).unwrap();
        assert_abs_diff_eq!(pos, *orbit.satellite().position(), epsilon = 1e-6);
        assert_abs_diff_eq!(vel, *orbit.satellite().velocity(), epsilon = 1e-9);
    }

    #[test]
    fn elements_survive_propagation() {
        let orbit = reference_orbit();
        for &dt in &[-1800.0, 900.0, 3600.0, 20_000.0] {
            let later = orbit.propagated(dt).unwrap();
            assert_relative_eq!(later.semimajor_axis(), orbit.semimajor_axis(), max_relative = 1e-9);
            assert_relative_eq!(later.eccentricity(), orbit.eccentricity(), max_relative = 1e-7);
            assert_relative_eq!(later.inclination(), orbit.inclination(), max_relative = 1e-9);
        }
    }

    #[test]
    fn backward_propagation_lands_on_inbound_leg() {
        let orbit = reference_orbit();
        let earlier = orbit.propagated(-1800.0).unwrap();
        assert!(earlier.radial_velocity() < 0.0);
        assert_relative_eq!(earlier.true_anomaly().unwrap(), 247.296_123_46, max_relative = 1e-7);
    }

    #[test]
    fn propagate_keeps_source_untouched() {
        let orbit = reference_orbit();
        let before = orbit.satellite().as_ref().clone();
        let moved = orbit.propagate(3600.0).unwrap();
        assert_eq!(orbit.satellite().as_ref(), &before);
        assert_eq!(moved.name(), "Satellite");
        assert_ne!(moved.position(), before.position());
        // point-mass gravity points back at the center
        assert!(moved.acceleration().dot(moved.position()) < 0.0);
    }

    #[test]
    fn tight_cap_surfaces_non_convergence() {
        let orbit = reference_orbit();
        let cfg = KeplerConfig { tolerance: 1e-14, max_iterations: 1 };
        assert!(matches!(
            orbit.state_at_with(3600.0, &cfg),
            Err(OrbitError::MaxIterationsExceeded { iterations: 1, .. })
        ));
    }

    #[test]
    fn from_altitudes_places_satellite_at_perigee() {
        let body = Arc::new(earth());
        let orbit = Orbit::from_altitudes(body, &spacecraft(), 480.0, 800.0).unwrap();
        assert_relative_eq!(orbit.perigee_altitude(), 480.0, max_relative = 1e-9);
        assert_relative_eq!(orbit.apogee_altitude(), 800.0, max_relative = 1e-9);
        assert_relative_eq!(orbit.semimajor_axis(), R_EARTH + 640.0, max_relative = 1e-12);
        assert_abs_diff_eq!(orbit.true_anomaly().unwrap(), 0.0, epsilon = 1e-6);
        assert_eq!(orbit.inclination(), 0.0);
        assert_eq!(
            orbit.right_ascension(),
            Err(OrbitError::Degenerate(DegenerateQuantity::NodeLine))
        );
        assert_eq!(orbit.satellite().name(), "Spacecraft");
        assert_eq!(orbit.satellite().mass(), 2000.0);
    }

    #[test]
    fn from_altitudes_accepts_reversed_order() {
        let body = Arc::new(earth());
        let a = Orbit::from_altitudes(Arc::clone(&body), &spacecraft(), 800.0, 480.0).unwrap();
        let b = Orbit::from_altitudes(body, &spacecraft(), 480.0, 800.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_altitudes_rejects_radius_below_center() {
        let body = Arc::new(earth());
        let err = Orbit::from_altitudes(body, &spacecraft(), -7000.0, 800.0).unwrap_err();
        assert!(matches!(err, OrbitError::InvalidState(_)));
    }

    #[test]
    fn construction_rejects_invalid_states() {
        let body = Arc::new(earth());
        let at_center = ParticleBuilder::new("Sat")
            .velocity(Vector3::new(0.0, 7.5, 0.0))
            .build()
            .unwrap();
        assert!(matches!(
            Orbit::new(Arc::clone(&body), Arc::new(at_center)),
            Err(OrbitError::InvalidState(_))
        ));

        let at_rest = ParticleBuilder::new("Sat")
            .position(Vector3::new(7000.0, 0.0, 0.0))
            .build()
            .unwrap();
        assert!(matches!(
            Orbit::new(Arc::clone(&body), Arc::new(at_rest)),
            Err(OrbitError::InvalidState(_))
        ));

        let out_of_bounds = ParticleBuilder::new("Sat")
            .position(Vector3::new(7000.0, 0.0, 0.0))
            .velocity(Vector3::new(0.0, 7.5, 0.0))
            .validity(6000.0)
            .build()
            .unwrap();
        assert!(matches!(
            Orbit::new(body, Arc::new(out_of_bounds)),
            Err(OrbitError::InvalidState(_))
        ));
    }

    #[test]
    fn ephemeris_samples_one_period() {
        let body = Arc::new(earth());
        let orbit = Orbit::from_altitudes(Arc::clone(&body), &spacecraft(), 300.0, 300.0).unwrap();
        let period = orbit.period().unwrap();
        let samples = orbit.ephemeris(60.0, period).unwrap();
        assert_eq!(samples.len(), (period / 60.0).floor() as usize + 1);
        assert_eq!(samples[0].time, 0.0);
        for s in &samples {
            assert_relative_eq!(s.altitude(&body), 300.0, max_relative = 1e-8);
            assert_relative_eq!(s.speed(), (body.mu() / (R_EARTH + 300.0)).sqrt(), max_relative = 1e-8);
        }
    }

    #[test]
    fn ephemeris_rejects_oversized_sample_count() {
        let orbit = reference_orbit();
        assert!(matches!(orbit.ephemeris(1e-300, 1e300), Err(OrbitError::InvalidState(_))));
        assert!(matches!(
            orbit.ephemeris(1.0, MAX_EPHEMERIS_SAMPLES as f64),
            Err(OrbitError::InvalidState(_))
        ));
    }

    #[test]
    fn ephemeris_rejects_bad_step() {
        let orbit = reference_orbit();
        assert!(orbit.ephemeris(0.0, 100.0).is_err());
        assert!(orbit.ephemeris(10.0, -1.0).is_err());
    }
}
