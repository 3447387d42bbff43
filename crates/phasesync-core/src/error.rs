//! Error types reported by the estimators
//!
//! Every failure is detected at the call boundary and returned as a typed
//! [`EstimateError`]; no estimator hands NaN or infinity back to the caller.

use thiserror::Error;

/// Errors produced by the phase and delay estimators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Signal length mismatch: signal 1 has {left} samples, signal 2 has {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Signals must contain at least one sample")]
    EmptySignal,

    #[error("Signal {signal} has a non-finite sample at index {index}")]
    NonFiniteSample { signal: u8, index: usize },

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("Correlation is undefined: signal {signal} has zero variance")]
    UndefinedCorrelation { signal: u8 },

    #[error("Dominant bin is ambiguous: bins {first} and {second} share the peak magnitude")]
    AmbiguousDominantBin { first: usize, second: usize },

    #[error("Signal {signal} has no energy at dominant bin {bin}")]
    SilentBin { signal: u8, bin: usize },

    #[error("Cross-correlation phase requires a finite, positive signal period")]
    MissingPeriod,
}

impl EstimateError {
    /// True for the errors caused by malformed input signals
    ///
    /// These are length mismatches, empty sequences, non-finite samples and
    /// an unusable sample rate.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. }
                | Self::EmptySignal
                | Self::NonFiniteSample { .. }
                | Self::InvalidSampleRate(_)
        )
    }
}

/// Result alias for estimator operations
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Check the preconditions shared by all estimators
///
/// Both signals must be non-empty, have the same length and contain only
/// finite samples.
pub(crate) fn validate_pair(signal1: &[f64], signal2: &[f64]) -> Result<()> {
    if signal1.len() != signal2.len() {
        return Err(EstimateError::ShapeMismatch {
            left: signal1.len(),
            right: signal2.len(),
        });
    }
    if signal1.is_empty() {
        return Err(EstimateError::EmptySignal);
    }
    for (signal, samples) in [(1u8, signal1), (2u8, signal2)] {
        if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
            return Err(EstimateError::NonFiniteSample { signal, index });
        }
    }
    Ok(())
}

pub(crate) fn validate_sample_rate(fs: f64) -> Result<()> {
    if fs.is_finite() && fs > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::InvalidSampleRate(fs))
    }
}
