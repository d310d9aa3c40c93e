pub mod state;

pub use state::{Body, Particle, ParticleBuilder};
