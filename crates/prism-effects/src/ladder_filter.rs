//! Resonant ladder filter stage.

use prism_core::{Effect, Ladder, LadderMode, Stage};

/// Ladder filter parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderParams {
    /// Response type
    pub mode: LadderMode,
    /// Cutoff in Hz
    pub cutoff_hz: f32,
    /// Resonance, 0 to 1
    pub resonance: f32,
    /// Input drive, 1 to 100
    pub drive: f32,
}

impl Default for LadderParams {
    fn default() -> Self {
        Self {
            mode: LadderMode::Lpf12,
            cutoff_hz: 20000.0,
            resonance: 0.0,
            drive: 1.0,
        }
    }
}

/// Mono ladder filter with six response modes.
///
/// # Example
///
/// ```rust
/// use prism_core::{Effect, LadderMode, Stage};
/// use prism_effects::{LadderFilter, LadderParams};
///
/// let mut filter = LadderFilter::new(48000.0);
/// filter.apply(&LadderParams {
///     mode: LadderMode::Lpf24,
///     cutoff_hz: 400.0,
///     resonance: 0.5,
///     drive: 2.0,
/// });
/// assert!(filter.process(0.25).is_finite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LadderFilter {
    ladder: Ladder,
    params: LadderParams,
}

impl LadderFilter {
    /// Create with default parameters (open LPF12).
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            ladder: Ladder::new(sample_rate),
            params: LadderParams::default(),
        };
        filter.push_params();
        filter
    }

    /// Current parameters.
    pub fn params(&self) -> &LadderParams {
        &self.params
    }

    fn push_params(&mut self) {
        self.ladder.set_mode(self.params.mode);
        self.ladder.set_cutoff(self.params.cutoff_hz);
        self.ladder.set_resonance(self.params.resonance);
        self.ladder.set_drive(self.params.drive);
    }
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for LadderFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.ladder.process(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ladder.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.ladder.reset();
    }
}

impl Stage for LadderFilter {
    type Params = LadderParams;

    fn apply(&mut self, params: &LadderParams) {
        if *params == self.params {
            return;
        }
        self.params = *params;
        self.push_params();
    }
}
