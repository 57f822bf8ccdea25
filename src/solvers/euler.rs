//! Forward Euler method for numerical integration

use super::{ExplicitSolver, Solver, State2};

/// Explicit forward Euler method
///
/// First-order, single-stage explicit integration method.
///
/// # Mathematical Form
/// ```text
/// x_{n+1} = x_n + h * f(x_n, t_n)
/// ```
///
/// # Characteristics
/// - Order: 1
/// - Stages: 1
/// - Explicit, fixed timestep
/// - Not A-stable
///
/// # Note
/// Every state component is updated from the derivative evaluated at the
/// old state, so `x1` advances with the pre-step `x2`. The plant model
/// relies on this ordering.
///
/// # References
/// - Hairer, E., Nørsett, S. P., & Wanner, G. (1993). "Solving Ordinary
///   Differential Equations I: Nonstiff Problems". Springer Series in
///   Computational Mathematics, Vol. 8.
#[derive(Debug, Clone)]
pub struct Euler {
    state: State2,
}

impl Default for Euler {
    fn default() -> Self {
        Self {
            state: State2::zeros(),
        }
    }
}

impl Solver for Euler {
    fn state(&self) -> &State2 {
        &self.state
    }

    fn reset(&mut self) {
        self.state = State2::zeros();
    }
}

impl ExplicitSolver for Euler {
    #[inline]
    fn step<F>(&mut self, mut f: F, t: f64, dt: f64)
    where
        F: FnMut(&State2, f64) -> State2,
    {
        let derivative = f(&self.state, t);
        self.state += derivative * dt;
    }
}
