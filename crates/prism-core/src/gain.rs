//! Click-free gain staging.
//!
//! [`GainStage`] applies a decibel gain to a stereo pair with a per-sample
//! linear ramp in the *linear* gain domain, so a host moving a gain fader
//! never produces a step. Both channels share one ramp.
//!
//! # Usage
//!
//! ```rust
//! use prism_core::GainStage;
//!
//! let mut gain = GainStage::new();
//! gain.prepare(48000.0, 0.05);
//! gain.set_gain_db(-6.0);
//!
//! let mut left = [1.0; 64];
//! let mut right = [1.0; 64];
//! gain.process_stereo(&mut left, &mut right);
//! assert!(left[63] < 1.0 && left[63] > 0.5);
//! ```

use crate::{LinearSmoothedParam, db_to_linear};

/// Ramped stereo gain with a decibel interface.
#[derive(Debug, Clone, PartialEq)]
pub struct GainStage {
    gain: LinearSmoothedParam,
    gain_db: f32,
}

impl GainStage {
    /// Unity gain, no ramp until [`prepare`](Self::prepare) is called.
    pub fn new() -> Self {
        Self {
            gain: LinearSmoothedParam::new(1.0),
            gain_db: 0.0,
        }
    }

    /// Configure the ramp for `sample_rate` and settle on the current target.
    pub fn prepare(&mut self, sample_rate: f32, ramp_seconds: f32) {
        self.gain.reset(sample_rate, ramp_seconds);
    }

    /// Set the target gain in decibels.
    pub fn set_gain_db(&mut self, db: f32) {
        if db == self.gain_db {
            return;
        }
        self.gain_db = db;
        self.gain.set_target(db_to_linear(db));
    }

    /// Set the gain immediately, without a ramp.
    pub fn set_gain_db_immediate(&mut self, db: f32) {
        self.gain_db = db;
        self.gain.set_immediate(db_to_linear(db));
    }

    /// Target gain in decibels.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Current linear gain (mid-ramp if a ramp is running).
    pub fn current_linear(&self) -> f32 {
        self.gain.get()
    }

    /// Apply the gain to both channels in place.
    ///
    /// Processes `min(left.len(), right.len())` frames.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        if self.gain.is_settled() {
            let g = self.gain.get();
            if g == 1.0 {
                return;
            }
            for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                *l *= g;
                *r *= g;
            }
            return;
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let g = self.gain.advance();
            *l *= g;
            *r *= g;
        }
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new()
    }
}
