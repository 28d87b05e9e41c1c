//! Configuration management for solver runs
//!
//! Reads TOML configuration files and provides the iteration and
//! time-stepping parameters consumed by the driver loops.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::driver::{SteadyConfig, TransientConfig};
use crate::error::{Error, Result};

/// Driver-loop configuration
///
/// ```toml
/// [iteration]
/// max_iterations = 100
/// tolerance = 1e-3
///
/// [time_stepping]   # transient runs only
/// dt = 0.01
/// num_timesteps = 1000
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriverConfig {
    pub iteration: IterationConfig,
    #[serde(default)]
    pub time_stepping: Option<TimeSteppingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IterationConfig {
    /// Outer iteration cap
    pub max_iterations: usize,
    /// L2 convergence threshold on the solution change
    pub tolerance: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeSteppingConfig {
    /// Time step size
    pub dt: f64,
    /// Number of steps to march
    pub num_timesteps: usize,
}

impl DriverConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let config: DriverConfig = toml::from_str(&contents).map_err(|e| Error::MalformedInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let fail = |reason: String| Error::MalformedInput {
            path: path.to_path_buf(),
            reason,
        };

        if self.iteration.max_iterations == 0 {
            return Err(fail("max_iterations must be positive".to_string()));
        }
        if !(self.iteration.tolerance > 0.0) {
            return Err(fail(format!(
                "tolerance must be positive, got {}",
                self.iteration.tolerance
            )));
        }
        if let Some(ts) = &self.time_stepping {
            if !(ts.dt > 0.0) {
                return Err(fail(format!("dt must be positive, got {}", ts.dt)));
            }
        }
        Ok(())
    }

    /// Parameters for the steady Picard loop
    pub fn steady(&self) -> SteadyConfig {
        SteadyConfig {
            max_iterations: self.iteration.max_iterations,
            tolerance: self.iteration.tolerance,
        }
    }

    /// Parameters for the transient loop, when configured
    pub fn transient(&self) -> Option<TransientConfig> {
        self.time_stepping.as_ref().map(|ts| TransientConfig {
            dt: ts.dt,
            num_timesteps: ts.num_timesteps,
        })
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("Solver configuration:");
        println!("  Max iterations: {}", self.iteration.max_iterations);
        println!("  Tolerance: {:.3e}", self.iteration.tolerance);
        if let Some(ts) = &self.time_stepping {
            println!("  Time step: {:.3e}", ts.dt);
            println!("  Timesteps: {}", ts.num_timesteps);
        }
    }
}
