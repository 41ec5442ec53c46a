//! Chorus built on an LFO-modulated fractional delay.

use libm::ceilf;
use prism_core::{Effect, InterpolatedDelay, Lfo, Stage, flush_denormal, ms_to_samples, wet_dry_mix};

/// Shortest center delay the modulated read position may use.
const MIN_DELAY_MS: f32 = 1.0;
/// Longest center delay accepted.
const MAX_CENTER_DELAY_MS: f32 = 100.0;
/// Modulation excursion at full depth.
const MAX_MOD_MS: f32 = 10.0;
/// Feedback is held inside this bound to keep the loop stable.
const MAX_FEEDBACK: f32 = 0.95;

/// Chorus parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParams {
    /// LFO rate in Hz
    pub rate_hz: f32,
    /// Modulation depth, 0 to 1
    pub depth: f32,
    /// Center delay in milliseconds
    pub center_delay_ms: f32,
    /// Feedback, -1 to 1
    pub feedback: f32,
    /// Wet/dry mix, 0 to 1
    pub mix: f32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            rate_hz: 0.2,
            depth: 0.05,
            center_delay_ms: 7.0,
            feedback: 0.0,
            mix: 0.05,
        }
    }
}

/// Mono chorus.
///
/// The read tap sits at `center + depth * MAX_MOD_MS * lfo` where the LFO is
/// unipolar, so the tap never moves ahead of the center delay.
///
/// # Example
///
/// ```rust
/// use prism_core::{Effect, Stage};
/// use prism_effects::{Chorus, ChorusParams};
///
/// let mut chorus = Chorus::new(44100.0);
/// chorus.apply(&ChorusParams { depth: 0.7, mix: 0.5, ..ChorusParams::default() });
/// let output = chorus.process(0.5);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Chorus {
    delay: InterpolatedDelay,
    lfo: Lfo,
    params: ChorusParams,
    sample_rate: f32,
    /// Last delayed sample, fed back into the delay input
    feedback_sample: f32,
}

impl Chorus {
    /// Create a chorus with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        let params = ChorusParams::default();
        Self {
            delay: InterpolatedDelay::new(max_delay_samples(sample_rate)),
            lfo: Lfo::new(sample_rate, params.rate_hz),
            params,
            sample_rate,
            feedback_sample: 0.0,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &ChorusParams {
        &self.params
    }
}

fn max_delay_samples(sample_rate: f32) -> usize {
    ceilf(ms_to_samples(MAX_CENTER_DELAY_MS + MAX_MOD_MS, sample_rate)) as usize + 2
}

impl Default for Chorus {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Chorus {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let lfo = (self.lfo.next() + 1.0) * 0.5;
        let center = self.params.center_delay_ms.clamp(MIN_DELAY_MS, MAX_CENTER_DELAY_MS);
        let delay_ms = center + self.params.depth.clamp(0.0, 1.0) * MAX_MOD_MS * lfo;

        let wet = self.delay.read(ms_to_samples(delay_ms, self.sample_rate));
        let feedback = self.params.feedback.clamp(-MAX_FEEDBACK, MAX_FEEDBACK);
        self.delay.write(input + self.feedback_sample * feedback);
        self.feedback_sample = flush_denormal(wet);

        wet_dry_mix(input, wet, self.params.mix)
    }

    /// Reallocates the delay line when the rate changes. Called from
    /// prepare, never from the audio path.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        let needed = max_delay_samples(sample_rate);
        if needed != self.delay.capacity() {
            self.delay.resize(needed);
        }
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.lfo.reset();
        self.feedback_sample = 0.0;
    }
}

impl Stage for Chorus {
    type Params = ChorusParams;

    fn apply(&mut self, params: &ChorusParams) {
        if params.rate_hz != self.params.rate_hz {
            self.lfo.set_frequency(params.rate_hz);
        }
        self.params = *params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chorus_basic() {
        let mut chorus = Chorus::new(44100.0);
        chorus.apply(&ChorusParams {
            mix: 1.0,
            ..ChorusParams::default()
        });

        for _ in 0..1000 {
            assert!(chorus.process(0.5).is_finite());
        }
    }

    #[test]
    fn test_impulse_arrives_after_center_delay() {
        let sr = 48000.0;
        let mut chorus = Chorus::new(sr);
        chorus.apply(&ChorusParams {
            depth: 0.0,
            mix: 1.0,
            center_delay_ms: 10.0,
            ..ChorusParams::default()
        });

        let mut first_nonzero = None;
        for n in 0..1000 {
            let y = chorus.process(if n == 0 { 1.0 } else { 0.0 });
            if y.abs() > 0.5 && first_nonzero.is_none() {
                first_nonzero = Some(n);
            }
        }
        // 10 ms at 48 kHz = 480 samples; the tap reads before the write
        assert_eq!(first_nonzero, Some(481));
    }

    #[test]
    fn test_sample_rate_change_resizes_delay() {
        let mut chorus = Chorus::new(44100.0);
        let before = chorus.delay.capacity();
        chorus.set_sample_rate(96000.0);
        assert!(chorus.delay.capacity() > before);
    }

    #[test]
    fn test_feedback_stays_bounded() {
        let mut chorus = Chorus::new(48000.0);
        chorus.apply(&ChorusParams {
            feedback: 1.0,
            mix: 1.0,
            depth: 1.0,
            ..ChorusParams::default()
        });
        for n in 0..48000 {
            let y = chorus.process(if n == 0 { 1.0 } else { 0.0 });
            assert!(y.abs() <= 1.0 + 1e-3);
        }
    }
}
