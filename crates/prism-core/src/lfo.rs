//! Low Frequency Oscillator for modulation effects.
//!
//! Sine-only phase accumulator used by the phaser sweep and the chorus
//! delay modulation.

use core::f32::consts::PI;
use libm::sinf;

/// Sine LFO producing values in `[-1.0, 1.0]`.
///
/// # Example
///
/// ```rust
/// use prism_core::Lfo;
///
/// let mut lfo = Lfo::new(44100.0, 2.0); // 2 Hz
/// let value = lfo.next();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create new LFO with given sample rate and frequency
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
        }
    }

    /// Set frequency in Hz
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Get current frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Reset phase to 0
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Sync phase to a specific value (0.0 - 1.0)
    ///
    /// 0.0 = 0°, 0.25 = 90°, 0.5 = 180°, 0.75 = 270°
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0);
    }

    /// Get current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Get next LFO value (-1.0 to 1.0)
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = sinf(self.phase * 2.0 * PI);

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Set sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfo_phase_accumulation() {
        let mut lfo = Lfo::new(44100.0, 1.0);

        for _ in 0..44100 {
            lfo.next();
        }

        let phase_error = lfo.phase.min((lfo.phase - 1.0).abs());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn test_lfo_output_range() {
        let mut lfo = Lfo::new(1000.0, 7.0);
        for _ in 0..2000 {
            let v = lfo.next();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_sample_rate_change_keeps_frequency() {
        let mut lfo = Lfo::new(44100.0, 0.5);
        lfo.set_sample_rate(96000.0);
        assert!((lfo.frequency() - 0.5).abs() < 1e-6);
    }
}
