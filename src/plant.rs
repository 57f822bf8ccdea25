//! Second-order plant model
//!
//! Implements the linear relationship
//!   b2*y'' + b1*y' + b0*y = a1*û + a0*u
//!
//! realized with the two states x1 = y and x2 = y', integrated with
//! forward Euler on a fixed time grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::error::{SimError, SimResult};
use crate::solvers::{Euler, ExplicitSolver, Solver, State2};

/// Plant coefficients `(a1, a0, b2, b1, b0)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParameters {
    pub a1: f64,
    pub a0: f64,
    pub b2: f64,
    pub b1: f64,
    pub b0: f64,
}

impl PlantParameters {
    /// Create a validated parameter set
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if `b2` is zero or not finite,
    /// since every integration step divides by it.
    pub fn new(a1: f64, a0: f64, b2: f64, b1: f64, b0: f64) -> SimResult<Self> {
        let params = Self { a1, a0, b2, b1, b0 };
        params.validate()?;
        Ok(params)
    }

    /// Check the `b2 != 0` invariant on an already built parameter set
    pub fn validate(&self) -> SimResult<()> {
        if self.b2 == 0.0 || !self.b2.is_finite() {
            return Err(SimError::invalid(
                "b2",
                self.b2,
                "leading coefficient must be finite and non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            a1: 1.0,
            a0: 1.0,
            b2: 1.0,
            b1: 1.0,
            b0: 1.0,
        }
    }
}

/// How the `a1` input term is fed to the plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    /// `û[i] = u[i]`: the input enters both numerator terms undifferentiated
    #[default]
    Direct,
    /// `û[i] = (u[i] - u[i-1]) / dt`: one-sided backward difference
    BackwardDifference,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Direct => "direct",
            InputMode::BackwardDifference => "backward-difference",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(InputMode::Direct),
            "backward-difference" | "backward" => Ok(InputMode::BackwardDifference),
            other => Err(format!(
                "unknown input mode '{other}' (expected direct or backward-difference)"
            )),
        }
    }
}

/// Plant model driven by a control-input sequence
///
/// # Example
///
/// ```
/// use pdsim::{InputMode, Plant, PlantParameters, SimulationClock};
///
/// let params = PlantParameters::new(1.0, 0.0, 1.0, 2.0, 1.0).unwrap();
/// let clock = SimulationClock::new(0.01, 1.0).unwrap();
/// let mut plant = Plant::new(params, clock, InputMode::Direct).unwrap();
///
/// let u = vec![1.0; clock.len()];
/// let (time, y) = plant.advance(&u).unwrap();
/// assert_eq!(time.len(), 100);
/// assert_eq!(y[0], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Plant {
    params: PlantParameters,
    clock: SimulationClock,
    input_mode: InputMode,
    solver: Euler,
    /// Input applied on the previous step, for the backward difference
    prev_input: f64,
}

impl Plant {
    /// Create a plant at rest
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if `params` breaks the
    /// `b2 != 0` invariant, which struct-literal construction bypasses.
    pub fn new(
        params: PlantParameters,
        clock: SimulationClock,
        input_mode: InputMode,
    ) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            clock,
            input_mode,
            solver: Euler::default(),
            prev_input: 0.0,
        })
    }

    /// Create a plant from raw coefficients, validating all of them
    #[allow(clippy::too_many_arguments)]
    pub fn from_coefficients(
        a1: f64,
        a0: f64,
        b2: f64,
        b1: f64,
        b0: f64,
        dt: f64,
        horizon: f64,
        input_mode: InputMode,
    ) -> SimResult<Self> {
        let params = PlantParameters::new(a1, a0, b2, b1, b0)?;
        let clock = SimulationClock::new(dt, horizon)?;
        Self::new(params, clock, input_mode)
    }

    pub fn params(&self) -> &PlantParameters {
        &self.params
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Current `(x1, x2)`
    pub fn state(&self) -> (f64, f64) {
        let x = self.solver.state();
        (x[0], x[1])
    }

    /// Integrate the whole horizon from rest under the control sequence `u`
    ///
    /// State is re-initialized to `(0, 0)` on every call, so the result
    /// never depends on earlier calls. `y[0]` is the initial condition and
    /// is always 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ShapeMismatch`] if `u.len()` differs from the
    /// number of grid points.
    pub fn advance(&mut self, u: &[f64]) -> SimResult<(Vec<f64>, Vec<f64>)> {
        let n = self.clock.len();
        SimError::check_len("control", n, u.len())?;

        let mut y = vec![0.0; n];
        self.reset(u[0]);
        for i in 1..n {
            y[i] = self.step(u[i]);
        }

        Ok((self.clock.time_points(), y))
    }

    /// Return the state to rest, with `u0` as the input of grid point 0
    pub fn reset(&mut self, u0: f64) {
        self.solver.reset();
        self.prev_input = u0;
    }

    /// Advance one grid step with input `u` and return the new output `x1`
    pub fn step(&mut self, u: f64) -> f64 {
        let dt = self.clock.dt();
        let p = self.params;
        let u_hat = match self.input_mode {
            InputMode::Direct => u,
            InputMode::BackwardDifference => (u - self.prev_input) / dt,
        };
        self.prev_input = u;

        self.solver.step(
            |x, _t| {
                let (x1, x2) = (x[0], x[1]);
                State2::new(x2, (-p.b1 * x2 - p.b0 * x1 + p.a1 * u_hat + p.a0 * u) / p.b2)
            },
            0.0,
            dt,
        );

        self.solver.state()[0]
    }
}
