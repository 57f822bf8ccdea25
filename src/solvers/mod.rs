//! Numerical integration solvers
//!
//! Fixed-step explicit integration of two-state systems.

mod base;
mod euler;

pub use base::*;
pub use euler::Euler;
