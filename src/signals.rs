//! Reference signal generation
//!
//! Produces the reference sequence for a run from a time grid. All
//! generators are pure functions of time.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Reference waveform selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// `amplitude` while `(t mod 2*duration) < duration`, else 0
    #[default]
    Rectangular,
    /// `amplitude * (2*|((t/duration) mod 2) - 1| - 1)`
    Triangular,
    /// `amplitude * sin(2*pi*frequency*t)`
    Harmonic,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::Rectangular,
        SignalKind::Triangular,
        SignalKind::Harmonic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Rectangular => "rectangular",
            SignalKind::Triangular => "triangular",
            SignalKind::Harmonic => "harmonic",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" => Ok(SignalKind::Rectangular),
            "triangular" => Ok(SignalKind::Triangular),
            "harmonic" => Ok(SignalKind::Harmonic),
            _ => Err(SimError::UnknownSignalKind(s.to_string())),
        }
    }
}

/// Shape parameters shared by all waveforms
///
/// `frequency` (Hz) only affects the harmonic signal, `duration` (s) only
/// the rectangular and triangular ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalShape {
    pub amplitude: f64,
    pub frequency: f64,
    pub duration: f64,
}

impl Default for SignalShape {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 1.0,
            duration: 1.0,
        }
    }
}

/// Value of waveform `kind` at time `t`
///
/// Remainders are floored, so negative times wrap the same way as positive
/// ones.
#[inline]
pub fn value_at(kind: SignalKind, t: f64, shape: &SignalShape) -> f64 {
    let SignalShape {
        amplitude,
        frequency,
        duration,
    } = *shape;

    match kind {
        SignalKind::Rectangular => {
            if t.rem_euclid(2.0 * duration) < duration {
                amplitude
            } else {
                0.0
            }
        }
        SignalKind::Triangular => {
            amplitude * (2.0 * ((t / duration).rem_euclid(2.0) - 1.0).abs() - 1.0)
        }
        SignalKind::Harmonic => amplitude * (2.0 * PI * frequency * t).sin(),
    }
}

/// Sample waveform `kind` on every point of `time`
///
/// # Errors
///
/// Returns [`SimError::InvalidParameter`] if a rectangular or triangular
/// signal is requested with a non-positive `duration`.
pub fn generate(kind: SignalKind, time: &[f64], shape: &SignalShape) -> SimResult<Vec<f64>> {
    if kind != SignalKind::Harmonic && !(shape.duration > 0.0) {
        return Err(SimError::invalid(
            "duration",
            shape.duration,
            "half-period must be > 0",
        ));
    }

    Ok(time.iter().map(|&t| value_at(kind, t, shape)).collect())
}

/// [`generate`] with the waveform given by name
///
/// # Errors
///
/// Returns [`SimError::UnknownSignalKind`] for any name other than
/// `rectangular`, `triangular` or `harmonic`.
pub fn generate_named(name: &str, time: &[f64], shape: &SignalShape) -> SimResult<Vec<f64>> {
    let kind: SignalKind = name.parse()?;
    generate(kind, time, shape)
}
