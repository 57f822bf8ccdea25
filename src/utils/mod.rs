//! Utility functions and constants

pub mod constants;
