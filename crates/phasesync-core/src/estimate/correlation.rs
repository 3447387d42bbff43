//! Pearson correlation coefficient between the two channels
//!
//! A similarity diagnostic, not a phase estimate: identical channels give
//! 1.0, inverted channels -1.0.

use crate::error::{validate_pair, EstimateError, Result};

/// Pearson correlation coefficient of two equal-length signals
///
/// A constant signal has no variance and reports
/// [`EstimateError::UndefinedCorrelation`] instead of NaN.
pub fn correlation_coefficient(signal1: &[f64], signal2: &[f64]) -> Result<f64> {
    validate_pair(signal1, signal2)?;

    for (signal, samples) in [(1u8, signal1), (2u8, signal2)] {
        if samples.iter().all(|&x| x == samples[0]) {
            return Err(EstimateError::UndefinedCorrelation { signal });
        }
    }

    let n = signal1.len() as f64;
    let mean1 = signal1.iter().sum::<f64>() / n;
    let mean2 = signal2.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance1 = 0.0;
    let mut variance2 = 0.0;
    for (&x, &y) in signal1.iter().zip(signal2) {
        let dx = x - mean1;
        let dy = y - mean2;
        covariance += dx * dy;
        variance1 += dx * dx;
        variance2 += dy * dy;
    }

    if variance1 == 0.0 {
        return Err(EstimateError::UndefinedCorrelation { signal: 1 });
    }
    if variance2 == 0.0 {
        return Err(EstimateError::UndefinedCorrelation { signal: 2 });
    }

    let r = (covariance / (variance1 * variance2).sqrt()).clamp(-1.0, 1.0);
    tracing::trace!(r, "Correlation coefficient computed");
    Ok(r)
}
