//! pdsim - Closed-loop PD control of a second-order plant
//!
//! Simulates the time response of the plant
//!
//! ```text
//! G(s) = (a1*s + a0) / (b2*s^2 + b1*s + b0)
//! ```
//!
//! under a proportional-derivative controller tracking a rectangular,
//! triangular or harmonic reference.
//!
//! # Architecture
//!
//! - [`Plant`] integrates its two states with forward Euler
//!   ([`solvers::Euler`]) over a fixed [`SimulationClock`].
//! - [`PdController`] computes the control action with one step of error
//!   memory.
//! - [`ClosedLoop`] couples them step by step; [`simulate`] builds a fresh
//!   loop from a [`SimulationConfig`].
//! - [`signals`] generates the reference, [`scope`] exports the traces,
//!   [`config`] and [`interactive`] supply parameters.
//!
//! # Example
//!
//! ```rust
//! use pdsim::prelude::*;
//!
//! let mut config = SimulationConfig::default();
//! config.plant = PlantParameters::new(1.0, 0.0, 1.0, 2.0, 1.0).unwrap();
//! config.controller = ControllerGains { kp: 10.0, kd: 2.0 };
//! config.signal.kind = SignalKind::Harmonic;
//!
//! let result = simulate(&config).unwrap();
//! assert_eq!(result.len(), 1000);
//! assert!(result.is_finite());
//! ```

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod interactive;
pub mod plant;
pub mod scope;
pub mod signals;
pub mod simulation;
pub mod solvers;
pub mod utils;

pub use clock::SimulationClock;
pub use config::{ConfigError, ControllerGains, SignalConfig, SimulationConfig, TimingConfig};
pub use controller::PdController;
pub use error::{SimError, SimResult};
pub use plant::{InputMode, Plant, PlantParameters};
pub use signals::{generate, generate_named, SignalKind, SignalShape};
pub use simulation::{simulate, ClosedLoop, LoopStrategy, SimulationResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::SimulationClock;
    pub use crate::config::{ControllerGains, SimulationConfig};
    pub use crate::controller::PdController;
    pub use crate::error::{SimError, SimResult};
    pub use crate::plant::{InputMode, Plant, PlantParameters};
    pub use crate::scope::{ExportFormat, PlotSink};
    pub use crate::signals::{SignalKind, SignalShape};
    pub use crate::simulation::{simulate, ClosedLoop, LoopStrategy, SimulationResult};
}
