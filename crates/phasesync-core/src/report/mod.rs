//! Result presentation data
//!
//! The printed summary and JSON report ([`summary`]) and the series an
//! external plotting tool needs to draw the time, spectrum and phase
//! panels ([`plot_data`]).

pub mod plot_data;
pub mod summary;

pub use plot_data::PlotData;
pub use summary::Report;
