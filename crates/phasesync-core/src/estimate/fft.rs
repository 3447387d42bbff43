//! Frequency-domain phase estimation at the dominant FFT bin
//!
//! Both signals are transformed and the phase difference is read off as the
//! angle of `X1[bin] / X2[bin]`, where `bin` is the largest-magnitude bin of
//! signal 1. If signal 2's energy sits in a different bin (noise, a second
//! tone) the estimate is still taken at signal 1's peak; the result is then
//! meaningless and nothing here detects it.

use serde::{Deserialize, Serialize};

use super::phase::PhaseEstimate;
use super::spectrum::{normalized_fft, MagnitudeSpectrum};
use crate::error::{validate_pair, validate_sample_rate, EstimateError, Result};

/// How the dominant bin is chosen when several bins share the peak magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinSelection {
    /// The lowest index wins
    #[default]
    FirstPeak,
    /// A tie is reported as [`EstimateError::AmbiguousDominantBin`]
    Strict,
}

/// Output of the FFT bin-phase estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FftPhase {
    /// Phase of signal 1 relative to signal 2 at the dominant bin
    pub phase: PhaseEstimate,
    /// One-sided magnitude spectrum of signal 1
    pub spectrum1: MagnitudeSpectrum,
    /// One-sided magnitude spectrum of signal 2
    pub spectrum2: MagnitudeSpectrum,
    /// Index of the dominant bin in signal 1's spectrum
    pub dominant_bin: usize,
}

impl FftPhase {
    /// Frequency of the dominant bin in Hz
    pub fn dominant_frequency(&self) -> f64 {
        self.spectrum1.frequency(self.dominant_bin)
    }
}

/// Estimate the phase difference at signal 1's dominant FFT bin
///
/// Ties between bins resolve to the lowest index.
pub fn estimate_fft_phase(signal1: &[f64], signal2: &[f64], fs: f64) -> Result<FftPhase> {
    estimate_fft_phase_with(signal1, signal2, fs, BinSelection::FirstPeak)
}

/// Estimate the phase difference with an explicit tie policy
pub fn estimate_fft_phase_with(
    signal1: &[f64],
    signal2: &[f64],
    fs: f64,
    selection: BinSelection,
) -> Result<FftPhase> {
    validate_pair(signal1, signal2)?;
    validate_sample_rate(fs)?;

    let fft1 = normalized_fft(signal1);
    let fft2 = normalized_fft(signal2);

    // Only the non-redundant half; the conjugate mirror of a real signal
    // has the same magnitude and the negated angle.
    let search_len = fft1.len() / 2 + 1;
    let magnitudes: Vec<f64> = fft1[..search_len].iter().map(|c| c.norm()).collect();
    let dominant_bin = dominant_bin(&magnitudes, selection)?;

    let x1 = fft1[dominant_bin];
    let x2 = fft2[dominant_bin];
    if x1.norm() == 0.0 {
        return Err(EstimateError::SilentBin {
            signal: 1,
            bin: dominant_bin,
        });
    }
    if x2.norm() == 0.0 {
        return Err(EstimateError::SilentBin {
            signal: 2,
            bin: dominant_bin,
        });
    }

    let phase = PhaseEstimate::from_radians((x1 / x2).arg());

    tracing::debug!(
        bin = dominant_bin,
        magnitude = x1.norm(),
        phase_rad = phase.radians(),
        "FFT phase estimated"
    );

    Ok(FftPhase {
        phase,
        spectrum1: MagnitudeSpectrum::from_spectrum(&fft1, fs),
        spectrum2: MagnitudeSpectrum::from_spectrum(&fft2, fs),
        dominant_bin,
    })
}

/// Index of the largest magnitude, first occurrence on ties
fn dominant_bin(magnitudes: &[f64], selection: BinSelection) -> Result<usize> {
    let mut best = 0;
    for (i, &m) in magnitudes.iter().enumerate().skip(1) {
        if m > magnitudes[best] {
            best = i;
        }
    }

    let peak = magnitudes[best];
    if let Some(second) = magnitudes
        .iter()
        .enumerate()
        .skip(best + 1)
        .find(|&(_, &m)| m == peak)
        .map(|(i, _)| i)
    {
        if selection == BinSelection::Strict {
            return Err(EstimateError::AmbiguousDominantBin {
                first: best,
                second,
            });
        }
        tracing::warn!(
            first = best,
            second,
            "Dominant bin is tied, using the lowest index"
        );
    }

    Ok(best)
}
