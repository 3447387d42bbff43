//! Combined estimator running all methods on one signal pair

use serde::{Deserialize, Serialize};

use super::correlation::correlation_coefficient;
use super::fft::{estimate_fft_phase_with, BinSelection};
use super::hilbert::estimate_hilbert_phase;
use super::phase::{delay_to_phase, PhaseEstimate, TimeDelayEstimate};
use super::spectrum::MagnitudeSpectrum;
use super::xcorr::estimate_time_delay;
use crate::error::{validate_sample_rate, EstimateError, Result};

fn default_precision() -> u32 {
    crate::DEFAULT_PRECISION
}

fn default_correlation_precision() -> u32 {
    crate::CORRELATION_PRECISION
}

/// Estimator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Report the Hilbert estimate as an unsigned magnitude
    #[serde(default)]
    pub discard_sign: bool,
    /// Tie policy for the dominant FFT bin
    #[serde(default)]
    pub bin_selection: BinSelection,
    /// Fundamental period in seconds; without it only the raw delay is reported
    #[serde(default)]
    pub period: Option<f64>,
    /// Decimals shown for phase values
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Decimals shown for the correlation coefficient
    #[serde(default = "default_correlation_precision")]
    pub correlation_precision: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            discard_sign: false,
            bin_selection: BinSelection::default(),
            period: None,
            precision: default_precision(),
            correlation_precision: default_correlation_precision(),
        }
    }
}

impl EstimatorConfig {
    /// Set the period from the fundamental frequency in Hz
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.period = Some(1.0 / frequency);
        self
    }
}

/// Results of all estimation methods for one signal pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    /// Phase at the dominant FFT bin
    pub fft_phase: PhaseEstimate,
    /// Dominant bin index in signal 1's spectrum
    pub dominant_bin: usize,
    /// Frequency of the dominant bin in Hz
    pub dominant_frequency: f64,
    /// Aggregate analytic-signal phase
    pub hilbert_phase: PhaseEstimate,
    /// Cross-correlation peak delay
    pub time_delay: TimeDelayEstimate,
    /// Delay converted to phase, present when the period is known
    pub xcorr_phase: Option<PhaseEstimate>,
    /// Pearson correlation coefficient
    pub correlation: f64,
}

/// A [`ResultBundle`] together with the spectra it was derived from
#[derive(Debug, Clone)]
pub struct Estimation {
    pub results: ResultBundle,
    pub spectrum1: MagnitudeSpectrum,
    pub spectrum2: MagnitudeSpectrum,
}

/// Phase estimator for a pair of synchronized channels
///
/// Holds only configuration; every call is independent, so one estimator
/// can be shared across threads.
///
/// # Example
/// ```
/// use phasesync_core::estimate::estimator::{EstimatorConfig, PhaseEstimator};
/// use phasesync_core::signal::generator::synthetic_pair;
///
/// let pair = synthetic_pair(1024.0, 25f64.to_radians(), 4096, 3.0 / 1024.0);
/// let config = EstimatorConfig::default().with_frequency(1024.0);
/// let estimator = PhaseEstimator::new(pair.sample_rate, config);
///
/// let results = estimator.estimate(&pair.signal1, &pair.signal2).unwrap();
/// assert!((results.hilbert_phase.degrees() - 25.0).abs() < 0.05);
/// ```
#[derive(Debug, Clone)]
pub struct PhaseEstimator {
    sample_rate: f64,
    config: EstimatorConfig,
}

impl PhaseEstimator {
    /// Create an estimator for signals sampled at `sample_rate` Hz
    pub fn new(sample_rate: f64, config: EstimatorConfig) -> Self {
        Self {
            sample_rate,
            config,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Run all estimators and return the result bundle
    pub fn estimate(&self, signal1: &[f64], signal2: &[f64]) -> Result<ResultBundle> {
        self.run(signal1, signal2).map(|e| e.results)
    }

    /// Run all estimators, keeping the magnitude spectra for inspection
    pub fn run(&self, signal1: &[f64], signal2: &[f64]) -> Result<Estimation> {
        validate_sample_rate(self.sample_rate)?;
        if let Some(period) = self.config.period {
            if !period.is_finite() || period <= 0.0 {
                return Err(EstimateError::MissingPeriod);
            }
        }

        let fft = estimate_fft_phase_with(
            signal1,
            signal2,
            self.sample_rate,
            self.config.bin_selection,
        )?;
        let hilbert_phase = estimate_hilbert_phase(signal1, signal2, self.config.discard_sign)?;
        let (time_delay, _) = estimate_time_delay(signal1, signal2, self.sample_rate)?;
        let xcorr_phase = match self.config.period {
            Some(period) => Some(delay_to_phase(time_delay.seconds, period)?),
            None => {
                tracing::warn!(
                    delay_s = time_delay.seconds,
                    "No signal period configured, skipping cross-correlation phase"
                );
                None
            }
        };
        let correlation = correlation_coefficient(signal1, signal2)?;

        let results = ResultBundle {
            fft_phase: fft.phase,
            dominant_bin: fft.dominant_bin,
            dominant_frequency: fft.dominant_frequency(),
            hilbert_phase,
            time_delay,
            xcorr_phase,
            correlation,
        };

        tracing::info!(
            samples = signal1.len(),
            fft_deg = results.fft_phase.degrees(),
            hilbert_deg = results.hilbert_phase.degrees(),
            xcorr_deg = ?results.xcorr_phase.map(|p| p.degrees()),
            correlation,
            "Phase difference estimated"
        );

        Ok(Estimation {
            results,
            spectrum1: fft.spectrum1,
            spectrum2: fft.spectrum2,
        })
    }
}
