//! Phasesync - phase synchronization verification for acquisition channels
//!
//! This library re-exports the estimation engine, signal sources and
//! report types from `phasesync-core`, and adds the persistent
//! command-line configuration ([`config`]).

pub mod config;

pub use phasesync_core::{error, estimate, report, signal};

pub use phasesync_core::{
    EstimateError, EstimatorConfig, PhaseEstimate, PhaseEstimator, ResultBundle, SignalPair,
    TimeDelayEstimate,
};
pub use phasesync_core::{BUILD_DATE, CORRELATION_PRECISION, DEFAULT_PRECISION, TEST_PRECISION, VERSION};
