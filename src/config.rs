//! Solver settings and their TOML loader.
//!
//! ```toml
//! [kepler]
//! tolerance = 1.0e-10
//! max_iterations = 200
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::OrbitError;

pub const DEFAULT_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Newton-Raphson settings for the universal Kepler solver.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeplerConfig {
    pub tolerance: f64,        // stop when |F/F'| drops below this
    pub max_iterations: usize, // hard cap, enforced unconditionally
}

impl Default for KeplerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KeplerConfig {
    pub fn validate(&self) -> Result<(), OrbitError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(OrbitError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(OrbitError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse the `[kepler]` table of a TOML document. A missing table yields defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.kepler.validate()?;
        Ok(file.kepler)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    kepler: KeplerConfig,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] OrbitError),
}

/// Load solver settings from a TOML file.
pub fn load_kepler_config<P: AsRef<Path>>(path: P) -> Result<KeplerConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    KeplerConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_solver_constants() {
        let cfg = KeplerConfig::default();
        assert_eq!(cfg.tolerance, 1e-8);
        assert_eq!(cfg.max_iterations, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let cfg = KeplerConfig::from_toml_str("[kepler]\nmax_iterations = 25\n").unwrap();
        assert_eq!(cfg.max_iterations, 25);
        assert_eq!(cfg.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn missing_table_is_default() {
        let cfg = KeplerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, KeplerConfig::default());
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let err = KeplerConfig::from_toml_str("[kepler]\ntolerance = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(OrbitError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = KeplerConfig::from_toml_str("[kepler\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_kepler_config("/nonexistent/orbit-calc.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
