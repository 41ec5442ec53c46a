//! Linear parameter ramps for zipper-free control changes.
//!
//! A knob twist arrives as a step. Feeding that step straight into a filter
//! or gain produces an audible click, so every continuously-variable control
//! is routed through a [`LinearSmoothedParam`] that walks from its current
//! value to the new target over a fixed number of samples.
//!
//! ## Retargeting
//!
//! Setting a new target while a ramp is still running starts a fresh ramp
//! from the *current* value, never from the previous target or the default.
//! Setting the same target again is a no-op and does not restart the ramp.
//!
//! ## Usage
//!
//! ```rust
//! use prism_core::LinearSmoothedParam;
//!
//! let mut cutoff = LinearSmoothedParam::new(1000.0);
//! cutoff.reset(48000.0, 0.05); // 50 ms ramp = 2400 samples
//!
//! cutoff.set_target(2000.0);
//!
//! // Sample-by-sample...
//! let first = cutoff.advance();
//! assert!(first > 1000.0 && first < 2000.0);
//!
//! // ...or jump ahead by a whole chunk.
//! cutoff.skip(2399);
//! assert_eq!(cutoff.get(), 2000.0);
//! ```

/// A parameter that ramps linearly to its target over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSmoothedParam {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Per-sample increment of the running ramp
    increment: f32,
    /// Samples until the running ramp lands on `target`
    samples_remaining: u32,
    /// Ramp length in samples for new targets
    ramp_samples: u32,
}

impl LinearSmoothedParam {
    /// Create a parameter resting at `initial`.
    ///
    /// The ramp length is zero until [`reset`](Self::reset) is called, so
    /// targets are applied instantly.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Create with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, ramp_seconds: f32) -> Self {
        let mut param = Self::new(initial);
        param.reset(sample_rate, ramp_seconds);
        param
    }

    /// Configure the ramp length as `ramp_seconds * sample_rate` samples and
    /// settle on the current target.
    ///
    /// Called on prepare and whenever the sample rate changes.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        self.ramp_samples = ramp_length(sample_rate, ramp_seconds);
        self.snap_to_target();
    }

    /// Ramp length in samples used for new targets.
    #[inline]
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Begin a ramp from the current value toward `target`.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;

        if self.ramp_samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.samples_remaining = 0;
        } else {
            self.increment = (target - self.current) / self.ramp_samples as f32;
            self.samples_remaining = self.ramp_samples;
        }
    }

    /// Set value immediately, cancelling any running ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }

    /// Get next smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target; // Snap to exact target
            }
        }
        self.current
    }

    /// Move `samples` steps along the ramp at once.
    ///
    /// Equivalent to calling [`advance`](Self::advance) `samples` times, and
    /// lands exactly on the target once the ramp is exhausted.
    pub fn skip(&mut self, samples: u32) -> f32 {
        if samples == 0 || self.samples_remaining == 0 {
            return self.current;
        }

        if samples >= self.samples_remaining {
            self.snap_to_target();
        } else {
            self.samples_remaining -= samples;
            self.current = self.target - self.increment * self.samples_remaining as f32;
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if transition is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn ramp_length(sample_rate: f32, ramp_seconds: f32) -> u32 {
    let samples = libm::roundf(ramp_seconds * sample_rate);
    if samples.is_finite() && samples > 0.0 {
        samples as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_smoothed_param_exact_time() {
        let mut param = LinearSmoothedParam::with_config(0.0, 48000.0, 0.010);
        param.set_target(1.0);

        // Run for exactly 10ms
        let samples = (48000.0 * 0.010) as usize;
        for _ in 0..samples {
            param.advance();
        }

        assert!(
            (param.get() - 1.0).abs() < 1e-5,
            "Should reach target exactly, got {}",
            param.get()
        );
        assert!(param.is_settled());
    }

    #[test]
    fn test_linear_smoothed_constant_rate() {
        let mut param = LinearSmoothedParam::with_config(0.0, 48000.0, 0.010);
        param.set_target(1.0);

        // After 5ms, should be halfway
        let samples = (48000.0 * 0.005) as usize;
        for _ in 0..samples {
            param.advance();
        }

        assert!(
            (param.get() - 0.5).abs() < 0.01,
            "Should be halfway, got {}",
            param.get()
        );
    }

    #[test]
    fn test_ramp_length_from_seconds() {
        let param = LinearSmoothedParam::with_config(0.0, 48000.0, 0.05);
        assert_eq!(param.ramp_samples(), 2400);

        let param = LinearSmoothedParam::with_config(0.0, 44100.0, 0.05);
        assert_eq!(param.ramp_samples(), 2205);
    }

    #[test]
    fn test_zero_ramp_is_instant() {
        let mut param = LinearSmoothedParam::new(0.0);
        param.set_target(0.75);
        assert_eq!(param.get(), 0.75);
        assert!(param.is_settled());
    }

    #[test]
    fn test_skip_matches_repeated_advance() {
        let mut stepped = LinearSmoothedParam::with_config(-1.0, 48000.0, 0.01);
        let mut skipped = stepped.clone();
        stepped.set_target(3.0);
        skipped.set_target(3.0);

        for _ in 0..100 {
            stepped.advance();
        }
        skipped.skip(100);

        assert!((stepped.get() - skipped.get()).abs() < 1e-4);
    }

    #[test]
    fn test_skip_past_end_lands_on_target() {
        let mut param = LinearSmoothedParam::with_config(0.0, 48000.0, 0.01);
        param.set_target(0.3);
        param.skip(10_000);
        assert_eq!(param.get(), 0.3);
        assert!(param.is_settled());
    }

    #[test]
    fn test_retarget_restarts_from_current_value() {
        let mut param = LinearSmoothedParam::with_config(0.0, 1000.0, 0.1);
        param.set_target(1.0);
        param.skip(50);
        let midway = param.get();
        assert!((midway - 0.5).abs() < 1e-5);

        param.set_target(0.0);
        // First step of the new ramp starts at the midway point, not at 1.0.
        let next = param.advance();
        assert!(next < midway);
        assert!((midway - next - 0.005).abs() < 1e-5);
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut param = LinearSmoothedParam::with_config(0.0, 1000.0, 0.1);
        param.set_target(1.0);
        param.skip(40);
        param.set_target(1.0);
        param.skip(60);
        assert!(param.is_settled());
        assert_eq!(param.get(), 1.0);
    }

    #[test]
    fn test_reset_settles_running_ramp() {
        let mut param = LinearSmoothedParam::with_config(0.0, 48000.0, 0.05);
        param.set_target(2.0);
        param.advance();
        param.reset(96000.0, 0.05);
        assert_eq!(param.get(), 2.0);
        assert_eq!(param.ramp_samples(), 4800);
    }
}
