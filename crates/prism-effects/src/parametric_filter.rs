//! Mode-switchable biquad with a coefficient cache.
//!
//! Coefficients are derived from a `{mode, frequency, quality, gain}`
//! snapshot. The snapshot of the last computation is kept, and a new set of
//! coefficients is computed only when an incoming snapshot differs from it in
//! any field. While a knob is being swept every chunk recomputes; once the
//! smoothers settle the trigonometry stops entirely.

use prism_core::{
    Biquad, BiquadCoefficients, Effect, Stage, allpass_coefficients, bandpass_coefficients,
    notch_coefficients, peaking_eq_coefficients,
};

/// Highest usable center frequency as a fraction of the sample rate.
const MAX_FREQ_RATIO: f32 = 0.49;

/// Response type of the parametric filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Peaking bell: boost or cut around the center frequency
    #[default]
    Peak,
    /// Constant 0 dB peak band-pass
    Bandpass,
    /// Band-reject
    Notch,
    /// Unity-magnitude phase rotator
    Allpass,
}

impl FilterMode {
    /// All modes in choice-index order.
    pub const ALL: [Self; 4] = [Self::Peak, Self::Bandpass, Self::Notch, Self::Allpass];

    /// Display labels in choice-index order.
    pub const LABELS: [&'static str; 4] = ["Peak", "Bandpass", "Notch", "Allpass"];

    /// Mode for a choice index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Choice index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parametric filter parameter snapshot, also the cache key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Response type
    pub mode: FilterMode,
    /// Center frequency in Hz
    pub frequency: f32,
    /// Quality factor
    pub quality: f32,
    /// Gain in dB, used by [`FilterMode::Peak`] only
    pub gain_db: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            mode: FilterMode::Peak,
            frequency: 1000.0,
            quality: 1.0,
            gain_db: 0.0,
        }
    }
}

impl FilterSettings {
    /// Closed-form coefficients for these settings.
    pub fn coefficients(&self, sample_rate: f32) -> BiquadCoefficients {
        let frequency = self.frequency.min(sample_rate * MAX_FREQ_RATIO);
        match self.mode {
            FilterMode::Peak => peaking_eq_coefficients(frequency, self.quality, self.gain_db, sample_rate),
            FilterMode::Bandpass => bandpass_coefficients(frequency, self.quality, sample_rate),
            FilterMode::Notch => notch_coefficients(frequency, self.quality, sample_rate),
            FilterMode::Allpass => allpass_coefficients(frequency, self.quality, sample_rate),
        }
    }
}

/// Mono parametric filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricFilter {
    biquad: Biquad,
    /// Settings the current coefficients were computed from
    cached: Option<FilterSettings>,
    sample_rate: f32,
    /// Number of coefficient computations so far
    generation: u64,
}

impl ParametricFilter {
    /// Create a filter with default settings applied.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            biquad: Biquad::new(),
            cached: None,
            sample_rate,
            generation: 0,
        };
        filter.update(&FilterSettings::default());
        filter
    }

    /// Recompute coefficients if `settings` differs from the cached snapshot.
    ///
    /// Returns `true` when a recomputation happened.
    pub fn update(&mut self, settings: &FilterSettings) -> bool {
        if self.cached.as_ref() == Some(settings) {
            return false;
        }
        self.biquad.set_coefficients(settings.coefficients(self.sample_rate));
        self.cached = Some(*settings);
        self.generation += 1;
        true
    }

    /// Active coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        self.biquad.coefficients()
    }

    /// Settings the active coefficients were computed from.
    pub fn settings(&self) -> Option<&FilterSettings> {
        self.cached.as_ref()
    }

    /// How many times coefficients have been computed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ParametricFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for ParametricFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        // Same settings, new rate: the cache key no longer describes the coefficients
        if let Some(settings) = self.cached.take() {
            self.update(&settings);
        }
    }

    fn reset(&mut self) {
        self.biquad.clear();
    }
}

impl Stage for ParametricFilter {
    type Params = FilterSettings;

    fn apply(&mut self, params: &FilterSettings) {
        self.update(params);
    }
}
