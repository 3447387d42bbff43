//! Rounded result summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::estimator::{EstimatorConfig, ResultBundle};
use crate::estimate::phase::{round_to, PhaseEstimate};

/// A phase rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPhase {
    pub degrees: f64,
    pub radians: f64,
}

impl DisplayPhase {
    fn new(phase: PhaseEstimate, digits: u32) -> Self {
        let (degrees, radians) = phase.rounded(digits);
        Self { degrees, radians }
    }
}

/// Display values of a [`ResultBundle`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedResults {
    pub fft: DisplayPhase,
    pub hilbert: DisplayPhase,
    pub xcorr: Option<DisplayPhase>,
    pub time_shift_s: f64,
    pub correlation: f64,
}

/// One estimation run, ready for printing or JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Samples per channel
    pub samples: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Full-precision results
    pub results: ResultBundle,
    /// Results rounded to the configured precision
    pub rounded: RoundedResults,
}

impl Report {
    /// Build a report, rounding with the precision from `config`
    pub fn new(
        results: ResultBundle,
        samples: usize,
        sample_rate: f64,
        config: &EstimatorConfig,
    ) -> Self {
        let digits = config.precision;
        let rounded = RoundedResults {
            fft: DisplayPhase::new(results.fft_phase, digits),
            hilbert: DisplayPhase::new(results.hilbert_phase, digits),
            xcorr: results.xcorr_phase.map(|p| DisplayPhase::new(p, digits)),
            time_shift_s: results.time_delay.seconds,
            correlation: round_to(results.correlation, config.correlation_precision),
        };

        Self {
            generated_at: Utc::now(),
            samples,
            sample_rate,
            results,
            rounded,
        }
    }

    /// Summary lines with unit labels
    pub fn summary_lines(&self) -> Vec<String> {
        let r = &self.rounded;
        let mut lines = vec![
            format!(
                "Phase diff (FFT)    : {} Deg   ( {} Rad)",
                r.fft.degrees, r.fft.radians
            ),
            format!(
                "Phase diff (Hilbert): {} Deg   ( {} Rad)",
                r.hilbert.degrees, r.hilbert.radians
            ),
        ];
        if let Some(xcorr) = r.xcorr {
            lines.push(format!(
                "Phase diff (XCorr)  : {} Deg   ( {} Rad)",
                xcorr.degrees, xcorr.radians
            ));
        }
        lines.push(format!("Time shift          : {} sec", r.time_shift_s));
        lines.push(format!("Correlation value   : {}", r.correlation));
        lines
    }

    /// Pretty-printed JSON form of the report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
