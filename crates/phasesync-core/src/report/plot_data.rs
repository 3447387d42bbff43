//! Series for the time, spectrum and phase-difference plots
//!
//! Only the first half of each record is exported, matching the one-sided
//! spectra.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::estimate::estimator::Estimation;
use crate::estimate::hilbert::instantaneous_phase_difference;
use crate::signal::SignalPair;

/// Plot series derived from one estimation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotData {
    pub generated_at: DateTime<Utc>,
    /// Sample times in seconds
    pub time: Vec<f64>,
    pub signal1: Vec<f64>,
    pub signal2: Vec<f64>,
    /// Frequency axis for the spectra in Hz
    pub frequencies: Vec<f64>,
    /// Attenuation of signal 1 per bin in dB (`null` for empty bins)
    pub spectrum1_db: Vec<Option<f64>>,
    /// Attenuation of signal 2 per bin in dB (`null` for empty bins)
    pub spectrum2_db: Vec<Option<f64>>,
    /// Per-sample phase difference in radians
    pub phase_difference: Vec<f64>,
}

impl PlotData {
    /// Collect plot series for a pair and the estimation run on it
    pub fn build(pair: &SignalPair, estimation: &Estimation) -> Result<Self> {
        let half = pair.len() / 2;
        let mut phase_difference = instantaneous_phase_difference(&pair.signal1, &pair.signal2)?;
        phase_difference.truncate(half);

        Ok(Self {
            generated_at: Utc::now(),
            time: (0..half).map(|i| i as f64 / pair.sample_rate).collect(),
            signal1: pair.signal1[..half].to_vec(),
            signal2: pair.signal2[..half].to_vec(),
            frequencies: estimation.spectrum1.frequencies(),
            spectrum1_db: estimation.spectrum1.attenuation_db(),
            spectrum2_db: estimation.spectrum2.attenuation_db(),
            phase_difference,
        })
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
