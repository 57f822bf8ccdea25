//! Simulation configuration
//!
//! One immutable [`SimulationConfig`] is built per run, from defaults, a
//! TOML file, command-line overrides or the interactive prompts, and then
//! handed to [`crate::simulate`].
//!
//! # File format
//!
//! ```toml
//! [plant]
//! a1 = 1.0
//! a0 = 0.0
//! b2 = 1.0
//! b1 = 2.0
//! b0 = 1.0
//!
//! [controller]
//! kp = 10.0
//! kd = 2.0
//!
//! [signal]
//! kind = "harmonic"
//! amplitude = 1.0
//! frequency = 1.0
//! duration = 1.0
//!
//! [timing]
//! dt = 0.01
//! T = 10.0
//! input_mode = "direct"
//! strategy = "reintegrate"
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::SimulationClock;
use crate::error::{SimError, SimResult};
use crate::plant::{InputMode, PlantParameters};
use crate::signals::{SignalKind, SignalShape};
use crate::simulation::LoopStrategy;
use crate::utils::constants::{SIM_DURATION, SIM_TIMESTEP};

/// Configuration loading and saving errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] SimError),
}

/// PD gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerGains {
    pub kp: f64,
    pub kd: f64,
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self { kp: 1.0, kd: 1.0 }
    }
}

/// Reference signal selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub kind: SignalKind,
    pub amplitude: f64,
    pub frequency: f64,
    pub duration: f64,
}

impl SignalConfig {
    pub fn shape(&self) -> SignalShape {
        SignalShape {
            amplitude: self.amplitude,
            frequency: self.frequency,
            duration: self.duration,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        let shape = SignalShape::default();
        Self {
            kind: SignalKind::default(),
            amplitude: shape.amplitude,
            frequency: shape.frequency,
            duration: shape.duration,
        }
    }
}

/// Time grid and integration choices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub dt: f64,
    #[serde(rename = "T", alias = "horizon")]
    pub horizon: f64,
    pub input_mode: InputMode,
    pub strategy: LoopStrategy,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dt: SIM_TIMESTEP,
            horizon: SIM_DURATION,
            input_mode: InputMode::default(),
            strategy: LoopStrategy::default(),
        }
    }
}

/// Everything the core needs for one run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub plant: PlantParameters,
    pub controller: ControllerGains,
    pub signal: SignalConfig,
    pub timing: TimingConfig,
}

impl SimulationConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config as TOML so a later run can reuse it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated plant coefficients
    pub fn plant_parameters(&self) -> SimResult<PlantParameters> {
        self.plant.validate()?;
        Ok(self.plant)
    }

    /// Validated time grid
    pub fn clock(&self) -> SimResult<SimulationClock> {
        SimulationClock::new(self.timing.dt, self.timing.horizon)
    }

    /// Check every invariant the core enforces, without running anything
    pub fn validate(&self) -> SimResult<()> {
        self.plant_parameters()?;
        self.clock()?;
        if self.signal.kind != SignalKind::Harmonic && !(self.signal.duration > 0.0) {
            return Err(SimError::invalid(
                "duration",
                self.signal.duration,
                "half-period must be > 0",
            ));
        }
        Ok(())
    }
}
