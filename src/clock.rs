//! Fixed-step simulation time grid

use crate::error::{SimError, SimResult};
use crate::utils::constants::SIM_MAX_SAMPLES;

/// Evenly spaced time grid `t_i = i * dt` for `i in 0..N`, `N = ceil(T / dt)`
///
/// The grid covers `[0, T)`, so `T` itself is only included when it does
/// not land exactly on a grid point. Fields are private: a clock cannot be
/// changed once a run has started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    dt: f64,
    horizon: f64,
    len: usize,
}

impl SimulationClock {
    /// Create a clock with timestep `dt` and total horizon `horizon`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] unless both values are finite
    /// and strictly positive, and if the grid would exceed
    /// [`SIM_MAX_SAMPLES`] points.
    pub fn new(dt: f64, horizon: f64) -> SimResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::invalid("dt", dt, "timestep must be finite and > 0"));
        }
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(SimError::invalid(
                "T",
                horizon,
                "horizon must be finite and > 0",
            ));
        }

        let samples = (horizon / dt).ceil();
        if !(samples <= SIM_MAX_SAMPLES as f64) {
            return Err(SimError::invalid(
                "dt",
                dt,
                "T / dt exceeds the 10^7 grid point limit",
            ));
        }
        let len = samples as usize;

        Ok(Self { dt, horizon, len })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Number of grid points `N`
    pub fn len(&self) -> usize {
        self.len
    }

    /// A valid clock always has at least one grid point
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of grid point `i`
    #[inline]
    pub fn time_at(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }

    /// Materialize the full grid
    pub fn time_points(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.time_at(i)).collect()
    }
}
