//! Analytic-signal (Hilbert transform) phase estimation
//!
//! The analytic signal `x + i*H[x]` is formed in the frequency domain:
//! the DC bin (and the Nyquist bin for even lengths) keeps weight 1,
//! positive frequencies are doubled and negative frequencies zeroed.
//!
//! The phase difference is the angle of the normalized inner product
//!
//! ```text
//! c = <x1h, conj(x2h)> / sqrt(<x1h, conj(x1h)> * <x2h, conj(x2h)>)
//! ```
//!
//! summed over all samples, which yields one aggregate angle for the
//! whole record.

use rustfft::{num_complex::Complex, FftPlanner};

use super::phase::PhaseEstimate;
use crate::error::{validate_pair, EstimateError, Result};

/// Compute the analytic signal of a real sequence
pub fn analytic_signal(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    if n == 0 {
        return buffer;
    }

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    // Positive frequencies run 1..(n+1)/2; for even n the Nyquist bin n/2
    // is shared between both halves and stays at weight 1.
    let positive_end = (n + 1) / 2;
    for c in buffer.iter_mut().take(positive_end).skip(1) {
        *c *= 2.0;
    }
    let negative_start = n / 2 + 1;
    for c in buffer.iter_mut().skip(negative_start) {
        *c = Complex::new(0.0, 0.0);
    }

    planner.plan_fft_inverse(n).process(&mut buffer);
    let norm = 1.0 / n as f64;
    for c in &mut buffer {
        *c *= norm;
    }
    buffer
}

/// Estimate the aggregate phase difference of two signals
///
/// With `discard_sign` set the unsigned magnitude of the angle is returned,
/// which is what the acquisition verification report shows.
pub fn estimate_hilbert_phase(
    signal1: &[f64],
    signal2: &[f64],
    discard_sign: bool,
) -> Result<PhaseEstimate> {
    validate_pair(signal1, signal2)?;

    let x1h = analytic_signal(signal1);
    let x2h = analytic_signal(signal2);

    let cross: Complex<f64> = x1h.iter().zip(&x2h).map(|(a, b)| a * b.conj()).sum();
    let energy1: f64 = x1h.iter().map(|a| a.norm_sqr()).sum();
    let energy2: f64 = x2h.iter().map(|b| b.norm_sqr()).sum();

    if energy1 == 0.0 {
        return Err(EstimateError::UndefinedCorrelation { signal: 1 });
    }
    if energy2 == 0.0 {
        return Err(EstimateError::UndefinedCorrelation { signal: 2 });
    }

    let c = cross / (energy1 * energy2).sqrt();
    let phase = PhaseEstimate::from_radians(c.arg());

    tracing::debug!(
        coherence = c.norm(),
        phase_rad = phase.radians(),
        discard_sign,
        "Hilbert phase estimated"
    );

    Ok(if discard_sign { phase.abs() } else { phase })
}

/// Per-sample phase difference `angle(x1h[n] / x2h[n])`
///
/// Intended for plotting the phase curve; samples where signal 2's analytic
/// signal vanishes report 0.
pub fn instantaneous_phase_difference(signal1: &[f64], signal2: &[f64]) -> Result<Vec<f64>> {
    validate_pair(signal1, signal2)?;

    let x1h = analytic_signal(signal1);
    let x2h = analytic_signal(signal2);

    Ok(x1h
        .iter()
        .zip(&x2h)
        .map(|(a, b)| {
            if b.norm_sqr() == 0.0 {
                0.0
            } else {
                (a / b).arg()
            }
        })
        .collect())
}
