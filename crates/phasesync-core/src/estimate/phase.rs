//! Phase and time-delay value types with wrap and rounding helpers

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::error::{EstimateError, Result};

/// A phase difference in radians, principal value in (-pi, pi]
///
/// Positive values mean signal 1 leads signal 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    radians: f64,
}

impl PhaseEstimate {
    /// Create an estimate, wrapping the angle to its principal value
    pub fn from_radians(radians: f64) -> Self {
        Self {
            radians: wrap_phase(radians),
        }
    }

    /// Create an estimate from degrees
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Phase in radians at full precision
    pub fn radians(&self) -> f64 {
        self.radians
    }

    /// Phase in degrees at full precision
    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    /// The unsigned magnitude of this estimate
    pub fn abs(&self) -> Self {
        Self {
            radians: self.radians.abs(),
        }
    }

    /// Display values `(degrees, radians)` rounded to `digits` decimals
    ///
    /// Radians are rounded first and the degree value is derived from the
    /// rounded radians, matching the printed summary of the verification
    /// tool.
    pub fn rounded(&self, digits: u32) -> (f64, f64) {
        let rad = round_to(self.radians, digits);
        (round_to(rad.to_degrees(), digits), rad)
    }
}

/// Time offset at which the cross-correlation peaks
///
/// Positive values mean signal 2 trails signal 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeDelayEstimate {
    /// Delay in seconds
    pub seconds: f64,
    /// Delay in whole samples
    pub lag_samples: i64,
}

impl TimeDelayEstimate {
    /// Convert the delay to a phase given the fundamental period in seconds
    pub fn to_phase(&self, period: f64) -> Result<PhaseEstimate> {
        delay_to_phase(self.seconds, period)
    }
}

/// Wrap an angle to its principal value in (-pi, pi]
pub fn wrap_phase(radians: f64) -> f64 {
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Convert a time delay to a phase using the signal period
///
/// `phase = 2pi * (((0.5 + delay / T) mod 1.0) - 0.5)`, so delays longer
/// than one period still land on the principal value.
pub fn delay_to_phase(delay: f64, period: f64) -> Result<PhaseEstimate> {
    if !period.is_finite() || period <= 0.0 {
        return Err(EstimateError::MissingPeriod);
    }
    let cycles = (0.5 + delay / period).rem_euclid(1.0) - 0.5;
    Ok(PhaseEstimate::from_radians(TAU * cycles))
}

/// Decimals beyond this exceed f64 precision and are returned unchanged
pub const MAX_ROUNDING_DIGITS: u32 = 15;

/// Round to a fixed number of decimals, half away from zero
///
/// `digits` is capped at [`MAX_ROUNDING_DIGITS`].
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits.min(MAX_ROUNDING_DIGITS) as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
