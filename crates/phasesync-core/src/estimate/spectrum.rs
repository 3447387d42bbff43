//! Forward FFT helpers and one-sided magnitude spectra

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

/// Forward FFT of a real signal, normalized by 1/N
pub fn normalized_fft(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    if n == 0 {
        return buffer;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let norm = 1.0 / n as f64;
    for c in &mut buffer {
        *c *= norm;
    }
    buffer
}

/// One-sided magnitude spectrum of a 1/N-normalized FFT
///
/// Holds bins `0..N/2`, the range the verification tool inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeSpectrum {
    /// Linear magnitude per bin
    pub magnitudes: Vec<f64>,
    /// Frequency spacing between bins in Hz (fs / N)
    pub bin_width: f64,
}

impl MagnitudeSpectrum {
    /// Build from a full-length normalized spectrum
    pub fn from_spectrum(spectrum: &[Complex<f64>], sample_rate: f64) -> Self {
        let n = spectrum.len();
        let half = n / 2;
        let bin_width = if n == 0 { 0.0 } else { sample_rate / n as f64 };
        Self {
            magnitudes: spectrum[..half].iter().map(|c| c.norm()).collect(),
            bin_width,
        }
    }

    /// Number of bins held
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency of bin `k` in Hz
    pub fn frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.bin_width
    }

    /// Frequency axis matching [`Self::magnitudes`]
    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.len()).map(|k| self.frequency(k)).collect()
    }

    /// Attenuation per bin, `-20 * log10(|X|)`
    ///
    /// Bins with exactly zero magnitude have no logarithm and yield `None`.
    pub fn attenuation_db(&self) -> Vec<Option<f64>> {
        self.magnitudes
            .iter()
            .map(|&m| (m > 0.0).then(|| -20.0 * m.log10()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn test_normalized_fft_of_constant() {
        let spectrum = normalized_fft(&[2.0; 16]);
        assert_relative_eq!(spectrum[0].re, 2.0, epsilon = 1e-12);
        for c in &spectrum[1..] {
            assert!(c.norm() < 1e-12);
        }
    }

    #[test]
    fn test_on_bin_sinusoid_magnitude() {
        let n = 64;
        let signal: Vec<f64> = (0..n)
            .map(|i| (TAU * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = MagnitudeSpectrum::from_spectrum(&normalized_fft(&signal), 640.0);

        assert_eq!(spectrum.len(), 32);
        // A unit cosine splits its energy between bin k and its mirror
        assert_relative_eq!(spectrum.magnitudes[4], 0.5, epsilon = 1e-12);
        assert_relative_eq!(spectrum.frequency(4), 40.0);
    }

    #[test]
    fn test_attenuation_guards_zero_bins() {
        let spectrum = MagnitudeSpectrum {
            magnitudes: vec![1.0, 0.1, 0.0, 0.001],
            bin_width: 1.0,
        };
        let db = spectrum.attenuation_db();
        assert_relative_eq!(db[0].unwrap(), 0.0);
        assert_relative_eq!(db[1].unwrap(), 20.0, epsilon = 1e-12);
        assert_eq!(db[2], None);
        assert_relative_eq!(db[3].unwrap(), 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_signal() {
        assert!(normalized_fft(&[]).is_empty());
        let spectrum = MagnitudeSpectrum::from_spectrum(&[], 1000.0);
        assert!(spectrum.is_empty());
    }
}
