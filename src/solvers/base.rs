//! Base solver traits and types

use nalgebra::Vector2;

/// State of a two-state (second-order) system: `[x1, x2]`
pub type State2 = Vector2<f64>;

/// Core solver trait for fixed-step numerical integration
pub trait Solver {
    /// Get current state vector
    fn state(&self) -> &State2;

    /// Return the state to rest `(0, 0)`
    fn reset(&mut self);
}

/// Explicit solver trait
pub trait ExplicitSolver: Solver {
    /// Advance the state by one step of size `dt` using the right-hand side `f(x, t)`
    fn step<F>(&mut self, f: F, t: f64, dt: f64)
    where
        F: FnMut(&State2, f64) -> State2;
}
