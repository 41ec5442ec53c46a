//! Overdrive: the ladder kernel's saturating input stage with the filter
//! held fully open.
//!
//! On prepare the internal ladder is pinned to LPF12 at 20 kHz with zero
//! resonance, so the stage behaves as drive only, not drive plus filter.

use prism_core::{Effect, Ladder, LadderMode, Stage};

/// Cutoff the internal ladder is pinned to.
pub const OPEN_CUTOFF_HZ: f32 = 20000.0;

/// Overdrive parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverdriveParams {
    /// Drive amount, 1 (clean) to 100
    pub drive: f32,
}

impl Default for OverdriveParams {
    fn default() -> Self {
        Self { drive: 1.0 }
    }
}

/// Mono overdrive.
///
/// # Example
///
/// ```rust
/// use prism_core::{Effect, Stage};
/// use prism_effects::{Overdrive, OverdriveParams};
///
/// let mut drive = Overdrive::new(48000.0);
/// drive.apply(&OverdriveParams { drive: 40.0 });
/// assert!(drive.process(0.9).abs() < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Overdrive {
    ladder: Ladder,
    params: OverdriveParams,
}

impl Overdrive {
    /// Create an overdrive at unity drive.
    pub fn new(sample_rate: f32) -> Self {
        let mut overdrive = Self {
            ladder: Ladder::new(sample_rate),
            params: OverdriveParams::default(),
        };
        overdrive.open_filter();
        overdrive
    }

    /// The internal ladder, for inspection.
    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    fn open_filter(&mut self) {
        self.ladder.set_mode(LadderMode::Lpf12);
        self.ladder.set_cutoff(OPEN_CUTOFF_HZ);
        self.ladder.set_resonance(0.0);
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Overdrive {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.ladder.process(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ladder.set_sample_rate(sample_rate);
        self.open_filter();
    }

    fn reset(&mut self) {
        self.ladder.reset();
    }
}

impl Stage for Overdrive {
    type Params = OverdriveParams;

    fn apply(&mut self, params: &OverdriveParams) {
        if params.drive != self.params.drive {
            self.ladder.set_drive(params.drive);
        }
        self.params = *params;
    }
}
