use log::debug;

use super::orbit::Orbit;
use crate::error::{OrbitError, Result};

/// Altitudes closer than this (relative) are treated as the same apsis.
const APSIS_MATCH_TOLERANCE: f64 = 1e-9;

fn same_altitude(a: f64, b: f64) -> bool {
    (a - b).abs() <= APSIS_MATCH_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

fn spans(orbit: &Orbit, low: f64, high: f64) -> bool {
    same_altitude(orbit.perigee_altitude(), low) && same_altitude(orbit.apogee_altitude(), high)
}

/// Delta-v budget of one two-impulse path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferPath {
    pub first_impulse: f64,   // km/s
    pub second_impulse: f64,  // km/s
    pub total: f64,           // km/s
    pub transfer_time: f64,   // s, half the delta orbit's period
}

impl TransferPath {
    fn new(first_impulse: f64, second_impulse: f64, delta: &Orbit) -> Result<Self> {
        Ok(TransferPath {
            first_impulse,
            second_impulse,
            total: first_impulse + second_impulse,
            transfer_time: 0.5 * delta.period()?,
        })
    }
}

/// Two-impulse transfer between two orbits about the same body.
///
/// Two candidate transfer ellipses are derived once at construction:
/// `perigee_delta` spans the start perigee and end apogee altitudes (first
/// burn at the start perigee), `apogee_delta` spans the start apogee and end
/// perigee altitudes (first burn at the start apogee). Each impulse is the
/// change in tangential speed h/r at the burn radius. Both paths are
/// reported; picking the cheaper one is left to the caller.
///
/// Burn radii come from the start and end orbits: perigee-first burns at
/// `start.perigee()` then `end.apogee()`, apogee-first at `start.apogee()` then
/// `end.perigee()`. Outward these coincide with the delta orbit's apsides; for an
/// inward transfer the second burn is still taken at the end orbit's apsis.
#[derive(Debug, Clone, PartialEq)]
pub struct HohmannTransfer {
    start: Orbit,
    end: Orbit,
    perigee_delta: Orbit,
    apogee_delta: Orbit,
    perigee_first: TransferPath,
    apogee_first: TransferPath,
}

impl HohmannTransfer {
    pub fn new(start: Orbit, end: Orbit) -> Result<Self> {
        if start.body() != end.body() {
            return Err(OrbitError::InvalidState(format!(
                "transfer between orbits around different bodies ({} and {})",
                start.body().name(),
                end.body().name()
            )));
        }
        for orbit in [&start, &end] {
            if !orbit.elements().is_bound() {
                return Err(OrbitError::Unbounded { semimajor_axis: orbit.semimajor_axis() });
            }
        }

        let perigee_delta =
            Self::delta_orbit(&start, &end, start.perigee_altitude(), end.apogee_altitude())?;
        let apogee_delta =
            Self::delta_orbit(&start, &end, start.apogee_altitude(), end.perigee_altitude())?;

        let h_start = start.elements().angular_momentum();
        let h_end = end.elements().angular_momentum();

        let h_pd = perigee_delta.elements().angular_momentum();
        let perigee_first = TransferPath::new(
            (h_start / start.perigee() - h_pd / start.perigee()).abs(),
            (h_end / end.apogee() - h_pd / end.apogee()).abs(),
            &perigee_delta,
        )?;

        let h_ad = apogee_delta.elements().angular_momentum();
        let apogee_first = TransferPath::new(
            (h_ad / start.apogee() - h_start / start.apogee()).abs(),
            (h_end / end.perigee() - h_ad / end.perigee()).abs(),
            &apogee_delta,
        )?;

        Ok(HohmannTransfer {
            start,
            end,
            perigee_delta,
            apogee_delta,
            perigee_first,
            apogee_first,
        })
    }

    /// Ellipse between two altitudes, reusing `start` or `end` when it already spans them.
    fn delta_orbit(start: &Orbit, end: &Orbit, from: f64, to: f64) -> Result<Orbit> {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        if spans(start, low, high) {
            debug!("delta orbit {low}..{high} km reuses the start orbit");
            Ok(start.clone())
        } else if spans(end, low, high) {
            debug!("delta orbit {low}..{high} km reuses the end orbit");
            Ok(end.clone())
        } else {
            Orbit::from_altitudes(start.body().clone(), start.satellite(), low, high)
        }
    }

    pub fn start(&self) -> &Orbit {
        &self.start
    }

    pub fn end(&self) -> &Orbit {
        &self.end
    }

    pub fn perigee_delta(&self) -> &Orbit {
        &self.perigee_delta
    }

    pub fn apogee_delta(&self) -> &Orbit {
        &self.apogee_delta
    }

    /// Path whose first burn is at the start perigee.
    pub fn perigee_first(&self) -> TransferPath {
        self.perigee_first
    }

    /// Path whose first burn is at the start apogee.
    pub fn apogee_first(&self) -> TransferPath {
        self.apogee_first
    }

    /// Total delta-v of the perigee-first path, km/s.
    pub fn delta_v(&self) -> f64 {
        self.perigee_first.total
    }
}
