//! PD controller

use crate::error::{SimError, SimResult};

/// Proportional-derivative controller with one step of error memory
///
/// # Control Law
///
/// u = Kp * e + Kd * (e - e_prev) / dt
///
/// where e = reference - measurement. The derivative is a backward
/// difference against the error of the previous call; the first call after
/// construction differences against zero, so it carries a spike of `e/dt`.
///
/// # Example
///
/// ```
/// use pdsim::PdController;
///
/// let mut pd = PdController::new(1.0, 1.0);
/// let u = pd.control(1.0, 0.0, 0.1).unwrap();
/// assert!((u - 11.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PdController {
    // Parameters
    kp: f64,
    kd: f64,

    // State
    prev_error: f64,
}

impl PdController {
    /// Create controller with gains; any real values are accepted
    pub fn new(kp: f64, kd: f64) -> Self {
        Self {
            kp,
            kd,
            prev_error: 0.0,
        }
    }

    /// `(Kp, Kd)`
    pub fn gains(&self) -> (f64, f64) {
        (self.kp, self.kd)
    }

    /// Error seen on the last call (0 before the first one)
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }

    /// Forget the error memory
    pub fn reset(&mut self) {
        self.prev_error = 0.0;
    }

    /// Compute the control action and remember the current error
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DivisionByZero`] if `dt == 0`. The error memory is
    /// left untouched in that case.
    pub fn control(&mut self, reference: f64, y: f64, dt: f64) -> SimResult<f64> {
        if dt == 0.0 {
            return Err(SimError::DivisionByZero("dt"));
        }

        let error = reference - y;
        let de = (error - self.prev_error) / dt;
        self.prev_error = error;

        Ok(self.kp * error + self.kd * de)
    }
}
