pub mod elements;
pub mod kepler;
pub mod lagrange;
pub mod maneuvers;
pub mod orbit;

pub use elements::OrbitalElements;
pub use kepler::{stumpff_c, stumpff_s, universal_anomaly, KeplerProblem, KeplerSolution};
pub use lagrange::LagrangeCoefficients;
pub use maneuvers::{HohmannTransfer, TransferPath};
pub use orbit::{EphemerisSample, Orbit};
