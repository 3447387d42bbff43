//! Signal sources
//!
//! - Synthetic sinusoid generation for verification runs ([`generator`])
//! - Fixed-point CSV channel loading from acquisition units ([`loader`])

pub mod generator;
pub mod loader;

use serde::{Deserialize, Serialize};

/// Two equal-length channels sampled at a common rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPair {
    /// First channel (the reference for the phase sign)
    pub signal1: Vec<f64>,
    /// Second channel
    pub signal2: Vec<f64>,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Fundamental period in seconds, when known
    pub period: Option<f64>,
}

impl SignalPair {
    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.signal1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal1.is_empty()
    }

    /// Record duration, the time of the last sample
    pub fn duration(&self) -> f64 {
        self.len().saturating_sub(1) as f64 / self.sample_rate
    }
}
