//! Closed-loop driver
//!
//! Couples a [`PdController`] and a [`Plant`] on a shared time grid:
//!
//! ```text
//! reference ──> (+) ──> [PD] ──> control ──> [plant] ──┬──> output
//!                ^ -                                   │
//!                └──────────── output[i-1] <───────────┘
//! ```
//!
//! At step `i` the controller sees the output of step `i-1`; the plant then
//! integrates the control history up to and including `control[i]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::controller::PdController;
use crate::error::{SimError, SimResult};
use crate::plant::Plant;
use crate::signals;

/// How the plant output is refreshed after each new control value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopStrategy {
    /// Re-run [`Plant::advance`] over the full control sequence every step.
    /// Control values past the current step are still zero at that point.
    #[default]
    Reintegrate,
    /// Carry plant state across steps and integrate one step at a time
    Incremental,
}

impl LoopStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopStrategy::Reintegrate => "reintegrate",
            LoopStrategy::Incremental => "incremental",
        }
    }
}

impl fmt::Display for LoopStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoopStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reintegrate" => Ok(LoopStrategy::Reintegrate),
            "incremental" => Ok(LoopStrategy::Incremental),
            other => Err(format!(
                "unknown loop strategy '{other}' (expected reintegrate or incremental)"
            )),
        }
    }
}

/// Signal sequences of one finished run, all of the same length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub time: Vec<f64>,
    pub reference: Vec<f64>,
    pub control: Vec<f64>,
    pub output: Vec<f64>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `reference[i] - output[i]` for every grid point
    pub fn tracking_error(&self) -> Vec<f64> {
        self.reference
            .iter()
            .zip(&self.output)
            .map(|(r, y)| r - y)
            .collect()
    }

    /// Largest `|reference - output|` over grid points with `t > after`
    ///
    /// Returns `None` when no grid point lies past `after`. NaN errors
    /// propagate into the result.
    pub fn peak_tracking_error(&self, after: f64) -> Option<f64> {
        self.time
            .iter()
            .zip(self.tracking_error())
            .filter(|(t, _)| **t > after)
            .map(|(_, e)| e.abs())
            .reduce(|acc, e| if e.is_nan() || e > acc { e } else { acc })
    }

    /// Last output value
    pub fn final_output(&self) -> Option<f64> {
        self.output.last().copied()
    }

    /// False if the plant diverged to infinity or NaN anywhere
    pub fn is_finite(&self) -> bool {
        self.output.iter().chain(&self.control).all(|v| v.is_finite())
    }
}

/// One closed-loop run over a plant, a controller and a reference
#[derive(Debug, Clone)]
pub struct ClosedLoop {
    plant: Plant,
    controller: PdController,
    reference: Vec<f64>,
    strategy: LoopStrategy,
}

impl ClosedLoop {
    /// Assemble a run
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ShapeMismatch`] if the reference does not have
    /// one value per grid point of the plant's clock.
    pub fn new(plant: Plant, controller: PdController, reference: Vec<f64>) -> SimResult<Self> {
        SimError::check_len("reference", plant.clock().len(), reference.len())?;
        Ok(Self {
            plant,
            controller,
            reference,
            strategy: LoopStrategy::default(),
        })
    }

    pub fn with_strategy(mut self, strategy: LoopStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> LoopStrategy {
        self.strategy
    }

    /// Run all `N - 1` steps
    ///
    /// Consumes the loop so plant and controller state cannot leak into
    /// another run.
    pub fn run(mut self) -> SimResult<SimulationResult> {
        let clock = *self.plant.clock();
        let n = clock.len();
        let dt = clock.dt();

        info!(
            samples = n,
            dt,
            strategy = %self.strategy,
            input_mode = %self.plant.input_mode(),
            "closed-loop run starting"
        );

        let mut control = vec![0.0; n];
        let mut output = vec![0.0; n];

        match self.strategy {
            LoopStrategy::Reintegrate => {
                for i in 1..n {
                    control[i] = self.controller.control(self.reference[i], output[i - 1], dt)?;
                    let (_, y) = self.plant.advance(&control)?;
                    output = y;
                }
            }
            LoopStrategy::Incremental => {
                self.plant.reset(control[0]);
                for i in 1..n {
                    control[i] = self.controller.control(self.reference[i], output[i - 1], dt)?;
                    output[i] = self.plant.step(control[i]);
                }
            }
        }

        let result = SimulationResult {
            time: clock.time_points(),
            reference: self.reference,
            control,
            output,
        };

        if !result.is_finite() {
            warn!("plant output diverged: sequence contains non-finite values");
        }
        debug!(
            final_output = ?result.final_output(),
            final_state = ?self.plant.state(),
            "closed-loop run finished"
        );

        Ok(result)
    }
}

/// Build fresh components from `config`, generate the reference and run
///
/// # Example
///
/// ```
/// use pdsim::{simulate, SignalKind, SimulationConfig};
///
/// let mut config = SimulationConfig::default();
/// config.signal.kind = SignalKind::Harmonic;
/// config.timing.horizon = 1.0;
///
/// let result = simulate(&config).unwrap();
/// assert_eq!(result.len(), 100);
/// assert_eq!(result.output[0], 0.0);
/// ```
pub fn simulate(config: &SimulationConfig) -> SimResult<SimulationResult> {
    let params = config.plant_parameters()?;
    let clock = config.clock()?;

    let plant = Plant::new(params, clock, config.timing.input_mode)?;
    let controller = PdController::new(config.controller.kp, config.controller.kd);
    let reference = signals::generate(
        config.signal.kind,
        &clock.time_points(),
        &config.signal.shape(),
    )?;

    info!(
        signal = %config.signal.kind,
        horizon = clock.horizon(),
        kp = config.controller.kp,
        kd = config.controller.kd,
        "simulating"
    );

    ClosedLoop::new(plant, controller, reference)?
        .with_strategy(config.timing.strategy)
        .run()
}
