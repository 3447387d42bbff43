//! Phasesync Core - phase and time-delay estimation between two channels
//!
//! Verifies time synchronization between acquisition units by comparing the
//! same waveform recorded on two channels. Three independent estimators
//! report the phase by which channel 1 leads channel 2:
//!
//! - the angle between the dominant FFT bins ([`estimate::fft`])
//! - the normalized inner product of the analytic signals ([`estimate::hilbert`])
//! - the peak of the linear cross-correlation ([`estimate::xcorr`])
//!
//! The Pearson correlation coefficient ([`estimate::correlation`]) is
//! reported alongside as a similarity check.

pub mod error;
pub mod estimate;
pub mod report;
pub mod signal;

pub use error::EstimateError;
pub use estimate::estimator::{EstimatorConfig, PhaseEstimator, ResultBundle};
pub use estimate::phase::{PhaseEstimate, TimeDelayEstimate};
pub use signal::SignalPair;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date stamped by build.rs
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Decimals shown for phase values in verification reports
pub const DEFAULT_PRECISION: u32 = 5;

/// Decimals shown for phase values in synthetic test runs
pub const TEST_PRECISION: u32 = 4;

/// Decimals shown for the correlation coefficient
pub const CORRELATION_PRECISION: u32 = 8;
