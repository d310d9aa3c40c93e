pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod orbital;
pub mod physics;

pub use config::KeplerConfig;
pub use dynamics::{Body, Particle, ParticleBuilder};
pub use error::{DegenerateQuantity, OrbitError};
pub use orbital::{HohmannTransfer, Orbit, OrbitalElements, TransferPath};
