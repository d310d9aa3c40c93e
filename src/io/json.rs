use std::io::{self, Write};

use nalgebra::Vector3;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::error::Result;
use crate::orbital::{HohmannTransfer, Orbit, TransferPath};

/// Element set of one orbit. Degenerate or unbounded quantities serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct ElementsReport {
    pub angular_vector: [f64; 3],
    pub node_line: [f64; 3],
    pub right_ascension_deg: Option<f64>,
    pub eccentricity_vector: [f64; 3],
    pub eccentricity: f64,
    pub radial_velocity_km_s: f64,
    pub perigee_argument_deg: Option<f64>,
    pub true_anomaly_deg: Option<f64>,
    pub inclination_deg: f64,
    pub distance_km: f64,
    pub perigee_km: f64,
    pub apogee_km: f64,
    pub semimajor_axis_km: f64,
    pub period_s: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbitReport {
    pub body: String,
    pub satellite: String,
    pub elements: ElementsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathReport {
    pub first_impulse_km_s: f64,
    pub second_impulse_km_s: f64,
    pub total_km_s: f64,
    pub transfer_time_s: f64,
}

/// Both candidate paths of a transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub body: String,
    pub start_altitudes_km: [f64; 2],
    pub end_altitudes_km: [f64; 2],
    pub perigee_first: PathReport,
    pub apogee_first: PathReport,
}

fn array(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn element(x: Result<f64>) -> Option<f64> {
    x.ok().filter(|v| v.is_finite())
}

impl From<&Orbit> for OrbitReport {
    fn from(orbit: &Orbit) -> Self {
        OrbitReport {
            body: orbit.body().name().to_string(),
            satellite: orbit.satellite().name().to_string(),
            elements: ElementsReport {
                angular_vector: array(&orbit.angular_vector()),
                node_line: array(&orbit.node_line()),
                right_ascension_deg: element(orbit.right_ascension()),
                eccentricity_vector: array(&orbit.eccentricity_vector()),
                eccentricity: orbit.eccentricity(),
                radial_velocity_km_s: orbit.radial_velocity(),
                perigee_argument_deg: element(orbit.perigee_argument()),
                true_anomaly_deg: element(orbit.true_anomaly()),
                inclination_deg: orbit.inclination(),
                distance_km: orbit.distance(),
                perigee_km: orbit.perigee(),
                apogee_km: orbit.apogee(),
                semimajor_axis_km: orbit.semimajor_axis(),
                period_s: element(orbit.period()),
            },
        }
    }
}

impl From<&TransferPath> for PathReport {
    fn from(path: &TransferPath) -> Self {
        PathReport {
            first_impulse_km_s: path.first_impulse,
            second_impulse_km_s: path.second_impulse,
            total_km_s: path.total,
            transfer_time_s: path.transfer_time,
        }
    }
}

impl From<&HohmannTransfer> for TransferReport {
    fn from(transfer: &HohmannTransfer) -> Self {
        let start = transfer.start();
        let end = transfer.end();
        TransferReport {
            body: start.body().name().to_string(),
            start_altitudes_km: [start.perigee_altitude(), start.apogee_altitude()],
            end_altitudes_km: [end.perigee_altitude(), end.apogee_altitude()],
            perigee_first: PathReport::from(&transfer.perigee_first()),
            apogee_first: PathReport::from(&transfer.apogee_first()),
        }
    }
}

/// Write the element set of an orbit as JSON to a writer.
pub fn write_elements<W: Write>(writer: &mut W, orbit: &Orbit) -> io::Result<()> {
    to_writer_pretty(&mut *writer, &OrbitReport::from(orbit))?;
    writeln!(writer)
}

/// Write both candidate paths of a transfer as JSON to a writer.
pub fn write_transfer<W: Write>(writer: &mut W, transfer: &HohmannTransfer) -> io::Result<()> {
    to_writer_pretty(&mut *writer, &TransferReport::from(transfer))?;
    writeln!(writer)
}

/// Write the element report of an orbit to a file.
pub fn write_elements_file(path: &str, orbit: &Orbit) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_elements(&mut file, orbit)
}
