//! Phaser with cascaded first-order allpass filters.
//!
//! The input is mixed with a phase-shifted copy of itself. The phase shift
//! comes from a cascade of allpass filters whose break frequency is swept
//! exponentially around a center frequency by a sine LFO, producing notches
//! that move up and down the spectrum.

use core::f32::consts::PI;
use libm::{exp2f, tanf};
use prism_core::{Effect, Lfo, Stage, flush_denormal, wet_dry_mix};

/// Number of allpass stages.
const STAGES: usize = 6;

/// How many samples between allpass coefficient updates.
///
/// At 48 kHz this gives ~0.67 ms between updates, fast enough that the sweep
/// sounds continuous while skipping most of the `tanf` work.
const COEFF_UPDATE_INTERVAL: u32 = 32;

/// Sweep width in octaves either side of the center at full depth.
const SWEEP_OCTAVES: f32 = 2.0;

/// Feedback is held inside this bound to keep the loop stable.
const MAX_FEEDBACK: f32 = 0.95;

/// Phaser parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaserParams {
    /// LFO rate in Hz
    pub rate_hz: f32,
    /// Sweep depth, 0 to 1
    pub depth: f32,
    /// Sweep center in Hz
    pub center_hz: f32,
    /// Feedback, -1 to 1
    pub feedback: f32,
    /// Wet/dry mix, 0 to 1
    pub mix: f32,
}

impl Default for PhaserParams {
    fn default() -> Self {
        Self {
            rate_hz: 1.0,
            depth: 0.05,
            center_hz: 1000.0,
            feedback: 0.0,
            mix: 0.05,
        }
    }
}

/// First-order allpass: `y[n] = a*x[n] + x[n-1] - a*y[n-1]`
/// with `a = (tan(pi*fc/fs) - 1) / (tan(pi*fc/fs) + 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FirstOrderAllpass {
    a: f32,
    x1: f32,
    y1: f32,
}

impl FirstOrderAllpass {
    #[inline]
    fn set_frequency(&mut self, freq: f32, sample_rate: f32) {
        let freq = freq.clamp(10.0, sample_rate * 0.4);
        let tan_val = tanf(PI * freq / sample_rate);
        self.a = (tan_val - 1.0) / (tan_val + 1.0);
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.a * input + self.x1 - self.a * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Mono phaser.
///
/// # Example
///
/// ```rust
/// use prism_core::{Effect, Stage};
/// use prism_effects::{Phaser, PhaserParams};
///
/// let mut phaser = Phaser::new(44100.0);
/// phaser.apply(&PhaserParams { depth: 0.8, mix: 0.5, ..PhaserParams::default() });
/// let output = phaser.process(0.5);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Phaser {
    allpass: [FirstOrderAllpass; STAGES],
    lfo: Lfo,
    params: PhaserParams,
    sample_rate: f32,
    /// Last wet sample, fed back into the cascade input
    feedback_sample: f32,
    /// Down-counter for coefficient decimation. Starts at 1 so the first
    /// sample triggers an update.
    coeff_update_counter: u32,
}

impl Phaser {
    /// Create a phaser with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        let params = PhaserParams::default();
        Self {
            allpass: [FirstOrderAllpass::default(); STAGES],
            lfo: Lfo::new(sample_rate, params.rate_hz),
            params,
            sample_rate,
            feedback_sample: 0.0,
            coeff_update_counter: 1,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &PhaserParams {
        &self.params
    }

    fn update_coefficients(&mut self, lfo_value: f32) {
        let center = self.params.center_hz * exp2f(lfo_value * self.params.depth * SWEEP_OCTAVES);
        for (i, stage) in self.allpass.iter_mut().enumerate() {
            // Slightly offset each stage for a richer notch pattern
            let stage_offset = 1.0 + (i as f32 * 0.1);
            stage.set_frequency(center * stage_offset, self.sample_rate);
        }
    }
}

impl Default for Phaser {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Phaser {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        // LFO advances every sample to keep phase correct
        let lfo_value = self.lfo.next();

        self.coeff_update_counter = self.coeff_update_counter.wrapping_sub(1);
        if self.coeff_update_counter == 0 {
            self.coeff_update_counter = COEFF_UPDATE_INTERVAL;
            self.update_coefficients(lfo_value);
        }

        let feedback = self.params.feedback.clamp(-MAX_FEEDBACK, MAX_FEEDBACK);
        let mut wet = input + self.feedback_sample * feedback;
        for stage in &mut self.allpass {
            wet = stage.process(wet);
        }
        self.feedback_sample = flush_denormal(wet);

        wet_dry_mix(input, wet, self.params.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.coeff_update_counter = 1;
    }

    fn reset(&mut self) {
        for stage in &mut self.allpass {
            stage.clear();
        }
        self.lfo.reset();
        self.feedback_sample = 0.0;
        self.coeff_update_counter = 1;
    }
}

impl Stage for Phaser {
    type Params = PhaserParams;

    fn apply(&mut self, params: &PhaserParams) {
        if params.rate_hz != self.params.rate_hz {
            self.lfo.set_frequency(params.rate_hz);
        }
        self.params = *params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wet_phaser() -> Phaser {
        let mut phaser = Phaser::new(48000.0);
        phaser.apply(&PhaserParams {
            depth: 1.0,
            mix: 0.5,
            feedback: 0.7,
            ..PhaserParams::default()
        });
        phaser
    }

    #[test]
    fn test_phaser_basic() {
        let mut phaser = wet_phaser();
        for i in 0..4800 {
            let input = if i % 100 < 50 { 0.5 } else { -0.5 };
            assert!(phaser.process(input).is_finite());
        }
    }

    #[test]
    fn test_dry_mix_passes_input() {
        let mut phaser = Phaser::new(48000.0);
        phaser.apply(&PhaserParams {
            mix: 0.0,
            ..PhaserParams::default()
        });
        for &x in &[0.1, -0.3, 0.7] {
            assert_eq!(phaser.process(x), x);
        }
    }

    #[test]
    fn test_wet_signal_differs_from_input() {
        let mut phaser = wet_phaser();
        let mut diff = 0.0;
        for i in 0..2000 {
            let x = libm::sinf(i as f32 * 0.05);
            diff += (phaser.process(x) - x).abs();
        }
        assert!(diff > 1.0, "phaser had no audible effect: {diff}");
    }

    #[test]
    fn test_full_negative_feedback_is_stable() {
        let mut phaser = Phaser::new(48000.0);
        phaser.apply(&PhaserParams {
            feedback: -1.0,
            mix: 1.0,
            depth: 1.0,
            ..PhaserParams::default()
        });
        let mut peak = 0.0_f32;
        for i in 0..48000 {
            let x = if i == 0 { 1.0 } else { 0.0 };
            peak = peak.max(phaser.process(x).abs());
        }
        assert!(peak.is_finite() && peak < 10.0);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut phaser = Phaser::new(48000.0);
        for _ in 0..100 {
            phaser.process(0.3);
        }
        phaser.reset();
        // Coefficients persist across reset, history does not
        assert_eq!(phaser.feedback_sample, 0.0);
        assert!(phaser.allpass.iter().all(|s| s.x1 == 0.0 && s.y1 == 0.0));
        assert_eq!(phaser.lfo.phase(), 0.0);
    }
}
