//! Simulation constants and defaults

/// Default simulation timestep
pub const SIM_TIMESTEP: f64 = 0.01;

/// Default simulation horizon
pub const SIM_DURATION: f64 = 10.0;

/// Time after which the closed loop is considered past its initial transient
pub const SIM_TRANSIENT: f64 = 2.0;

/// Largest time grid a clock will build, `ceil(T / dt)` included
pub const SIM_MAX_SAMPLES: usize = 10_000_000;
