//! Sinusoidal test signal generation
//!
//! Produces clean sinusoids with a known frequency and phase, giving the
//! estimators a ground truth to recover.

use std::f64::consts::TAU;

use super::SignalPair;

/// Sine wave generator
///
/// Generates `amplitude * sin(2*pi*f*n/fs + phase)` sample by sample.
#[derive(Debug, Clone)]
pub struct SineGenerator {
    /// Signal frequency in Hz
    frequency: f64,
    /// Sample rate in Hz
    sample_rate: f64,
    /// Phase offset in radians
    phase: f64,
    /// Amplitude scaling factor
    amplitude: f64,
    /// Index of the next sample
    position: u64,
}

impl SineGenerator {
    /// Create a new generator
    ///
    /// # Arguments
    /// * `frequency` - Signal frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `phase` - Phase offset in radians
    ///
    /// # Panics
    /// Panics if the sample rate is not positive
    ///
    /// # Example
    /// ```
    /// use phasesync_core::signal::generator::SineGenerator;
    ///
    /// let mut gen = SineGenerator::new(1000.0, 48000.0, 0.0);
    /// assert_eq!(gen.next_sample(), 0.0);
    /// ```
    pub fn new(frequency: f64, sample_rate: f64, phase: f64) -> Self {
        assert!(sample_rate > 0.0, "Sample rate must be positive");

        Self {
            frequency,
            sample_rate,
            phase,
            amplitude: 1.0,
            position: 0,
        }
    }

    /// Sample value at index `n`
    pub fn sample_at(&self, n: u64) -> f64 {
        let t = n as f64 / self.sample_rate;
        self.amplitude * (TAU * self.frequency * t + self.phase).sin()
    }

    /// Get the next sample
    pub fn next_sample(&mut self) -> f64 {
        let sample = self.sample_at(self.position);
        self.position += 1;
        sample
    }

    /// Fill a buffer with sequential samples
    pub fn fill_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Generate `n` sequential samples
    pub fn take(&mut self, n: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; n];
        self.fill_buffer(&mut buffer);
        buffer
    }

    /// Get current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reset the generator to sample 0
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Signal period in seconds
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Set the amplitude scaling factor (negative values are clamped to 0)
    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude.max(0.0);
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

/// Build a test pair with a known phase shift
///
/// `n` samples span `t_stop` seconds including both end points, so the
/// sample rate is `(n - 1) / t_stop`. Signal 1 leads signal 2 by `phase`
/// radians; the pair carries the ground-truth period.
///
/// # Panics
/// Panics if `n < 2` or `t_stop` is not positive
pub fn synthetic_pair(frequency: f64, phase: f64, n: usize, t_stop: f64) -> SignalPair {
    assert!(n >= 2, "A synthetic pair needs at least two samples");
    assert!(t_stop > 0.0, "Signal length must be positive");

    let sample_rate = (n - 1) as f64 / t_stop;
    let step = t_stop / (n - 1) as f64;
    let omega = TAU * frequency;

    let (signal1, signal2) = (0..n)
        .map(|i| {
            let t = i as f64 * step;
            ((omega * t + phase).sin(), (omega * t).sin())
        })
        .unzip();

    tracing::debug!(
        frequency,
        phase_rad = phase,
        samples = n,
        sample_rate,
        "Generated synthetic signal pair"
    );

    SignalPair {
        signal1,
        signal2,
        sample_rate,
        period: Some(1.0 / frequency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sine_starts_at_phase() {
        let mut gen = SineGenerator::new(100.0, 1000.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(gen.next_sample(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sine_repeats_each_period() {
        // 10 samples per period
        let mut gen = SineGenerator::new(100.0, 1000.0, 0.3);
        let first = gen.take(10);
        let second = gen.take(10);
        for (a, b) in first.iter().zip(&second) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reset() {
        let mut gen = SineGenerator::new(50.0, 1000.0, 0.0);
        gen.take(100);
        assert_eq!(gen.position(), 100);

        gen.reset();
        assert_eq!(gen.position(), 0);
    }

    #[test]
    fn test_amplitude() {
        let mut gen = SineGenerator::new(10.0, 1000.0, 0.0);
        gen.set_amplitude(0.25);
        for sample in gen.take(200) {
            assert!(sample.abs() <= 0.25 + 1e-12);
        }

        gen.set_amplitude(-1.0);
        assert_eq!(gen.amplitude(), 0.0);
    }

    #[test]
    fn test_synthetic_pair_timing() {
        let pair = synthetic_pair(1024.0, 0.5, 5 * 1024, 3.0 / 1024.0);
        assert_eq!(pair.len(), 5120);
        assert_relative_eq!(pair.sample_rate, 5119.0 * 1024.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(pair.period.unwrap(), 1.0 / 1024.0);
        assert_relative_eq!(pair.duration(), 3.0 / 1024.0, epsilon = 1e-12);

        assert_relative_eq!(pair.signal1[0], 0.5f64.sin(), epsilon = 1e-12);
        assert_eq!(pair.signal2[0], 0.0);
    }

    #[test]
    #[should_panic]
    fn test_synthetic_pair_too_short() {
        synthetic_pair(10.0, 0.0, 1, 1.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_sample_rate() {
        SineGenerator::new(10.0, 0.0, 0.0);
    }
}
