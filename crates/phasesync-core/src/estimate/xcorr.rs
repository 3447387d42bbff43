//! Time-domain cross-correlation delay estimation
//!
//! The full linear cross-correlation `r[k] = sum_n s1[n] * s2[n + k]` is
//! evaluated for every lag `k` in `-(N-1)..=(N-1)` through a zero-padded
//! FFT. The lag of the largest correlation value is mapped onto a time axis
//! and, when the signal period is known, onto a phase.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use super::phase::{delay_to_phase, PhaseEstimate, TimeDelayEstimate};
use crate::error::{validate_pair, validate_sample_rate, EstimateError, Result};

/// Output of the cross-correlation estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossCorrelationPhase {
    /// Time by which signal 2 trails signal 1
    pub delay: TimeDelayEstimate,
    /// Delay expressed as a phase of the fundamental period
    pub phase: PhaseEstimate,
    /// Correlation value at the peak
    pub peak: f64,
}

/// Full linear cross-correlation of two equal-length signals
///
/// Returns `2N - 1` values; index `i` holds lag `i - (N - 1)`.
pub fn cross_correlation(signal1: &[f64], signal2: &[f64]) -> Result<Vec<f64>> {
    validate_pair(signal1, signal2)?;

    let n = signal1.len();
    let out_len = 2 * n - 1;
    // FFT size must be a power of 2 covering every lag without wrap-around
    let fft_size = out_len.next_power_of_two();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut spectrum1 = zero_padded(signal1, fft_size);
    let mut spectrum2 = zero_padded(signal2, fft_size);
    fft.process(&mut spectrum1);
    fft.process(&mut spectrum2);

    // conj(S1) * S2 correlates signal 2 against signal 1
    for (s2, s1) in spectrum2.iter_mut().zip(&spectrum1) {
        *s2 *= s1.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut spectrum2);

    let norm = 1.0 / fft_size as f64;
    let max_lag = n - 1;
    Ok((0..out_len)
        .map(|i| {
            // Negative lags live at the top of the circular result
            let index = (i + fft_size - max_lag) % fft_size;
            spectrum2[index].re * norm
        })
        .collect())
}

fn zero_padded(signal: &[f64], size: usize) -> Vec<Complex<f64>> {
    signal
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(size)
        .collect()
}

/// Lag-time axis matching [`cross_correlation`]
///
/// `2N - 1` points evenly spaced over `[-t_max, +t_max]`, where `t_max` is
/// the time of the last sample, `(N - 1) / fs`.
pub fn lag_time_axis(n: usize, fs: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let t_max = (n - 1) as f64 / fs;
    let count = 2 * n - 1;
    if count == 1 {
        return vec![-t_max];
    }
    let step = 2.0 * t_max / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                t_max
            } else {
                -t_max + i as f64 * step
            }
        })
        .collect()
}

/// Estimate the time by which signal 2 trails signal 1
///
/// The lag with the largest signed correlation wins; ties (up to FFT
/// round-off) go to the most negative lag.
pub fn estimate_time_delay(
    signal1: &[f64],
    signal2: &[f64],
    fs: f64,
) -> Result<(TimeDelayEstimate, f64)> {
    validate_sample_rate(fs)?;
    let correlation = cross_correlation(signal1, signal2)?;

    for (signal, samples) in [(1u8, signal1), (2u8, signal2)] {
        if samples.iter().all(|&x| x == 0.0) {
            return Err(EstimateError::UndefinedCorrelation { signal });
        }
    }

    let peak_index = peak_index(&correlation);

    let n = signal1.len();
    let axis = lag_time_axis(n, fs);
    let delay = TimeDelayEstimate {
        seconds: axis[peak_index],
        lag_samples: peak_index as i64 - (n as i64 - 1),
    };

    tracing::debug!(
        lag_samples = delay.lag_samples,
        delay_s = delay.seconds,
        peak = correlation[peak_index],
        "Cross-correlation peak found"
    );

    Ok((delay, correlation[peak_index]))
}

/// Relative distance from the maximum within which two correlation values
/// count as equal, absorbing FFT round-off
const TIE_TOLERANCE: f64 = 1e-10;

/// Index of the largest signed value; the lowest index wins among values
/// equal to the maximum up to round-off
fn peak_index(correlation: &[f64]) -> usize {
    let max = correlation
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let scale = correlation.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let floor = max - scale * TIE_TOLERANCE;
    correlation
        .iter()
        .position(|&v| v >= floor)
        .unwrap_or(0)
}

/// Estimate the delay and convert it to a phase using the known period
///
/// `period` is the fundamental period in seconds; it cannot be inferred
/// from the record and must be supplied by the caller.
pub fn estimate_crosscorr_delay(
    signal1: &[f64],
    signal2: &[f64],
    fs: f64,
    period: f64,
) -> Result<CrossCorrelationPhase> {
    validate_pair(signal1, signal2)?;
    if !period.is_finite() || period <= 0.0 {
        return Err(EstimateError::MissingPeriod);
    }

    let (delay, peak) = estimate_time_delay(signal1, signal2, fs)?;
    let phase = delay_to_phase(delay.seconds, period)?;

    Ok(CrossCorrelationPhase { delay, phase, peak })
}
