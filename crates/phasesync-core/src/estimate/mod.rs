//! Phase and delay estimation
//!
//! - FFT bin-phase estimation ([`fft`])
//! - Analytic-signal (Hilbert) estimation ([`hilbert`])
//! - Cross-correlation delay estimation ([`xcorr`])
//! - Pearson correlation diagnostic ([`correlation`])
//! - All of the above on one pair ([`estimator`])

pub mod correlation;
pub mod estimator;
pub mod fft;
pub mod hilbert;
pub mod phase;
pub mod spectrum;
pub mod xcorr;

pub use correlation::correlation_coefficient;
pub use fft::{estimate_fft_phase, estimate_fft_phase_with, BinSelection, FftPhase};
pub use hilbert::{analytic_signal, estimate_hilbert_phase, instantaneous_phase_difference};
pub use phase::{delay_to_phase, round_to, wrap_phase, PhaseEstimate, TimeDelayEstimate};
pub use spectrum::MagnitudeSpectrum;
pub use xcorr::{
    cross_correlation, estimate_crosscorr_delay, estimate_time_delay, lag_time_axis,
    CrossCorrelationPhase,
};
