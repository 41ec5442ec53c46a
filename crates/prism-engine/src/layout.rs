//! Parameter layout of the processor.
//!
//! One static descriptor per control. Ids are persistence keys and never
//! change; ranges and defaults are what the control surface clamps against.

use prism_core::{LadderMode, ParamDescriptor, ParamUnit};
use prism_effects::FilterMode;

use crate::error::ParamError;
use crate::order::EffectOption;
use crate::params::{ParamIndex, ParamStore};

/// Parameter id strings.
pub mod ids {
    #![allow(missing_docs)]

    pub const PHASER_RATE: &str = "phaser_rate";
    pub const PHASER_DEPTH: &str = "phaser_depth";
    pub const PHASER_CENTER_FREQ: &str = "phaser_center_freq";
    pub const PHASER_FEEDBACK: &str = "phaser_feedback";
    pub const PHASER_MIX: &str = "phaser_mix";

    pub const CHORUS_RATE: &str = "chorus_rate";
    pub const CHORUS_DEPTH: &str = "chorus_depth";
    pub const CHORUS_CENTER_DELAY: &str = "chorus_center_delay";
    pub const CHORUS_FEEDBACK: &str = "chorus_feedback";
    pub const CHORUS_MIX: &str = "chorus_mix";

    pub const OVERDRIVE_DRIVE: &str = "overdrive_drive";

    pub const LADDER_MODE: &str = "ladder_mode";
    pub const LADDER_CUTOFF: &str = "ladder_cutoff";
    pub const LADDER_RESONANCE: &str = "ladder_resonance";
    pub const LADDER_DRIVE: &str = "ladder_drive";

    pub const FILTER_MODE: &str = "filter_mode";
    pub const FILTER_FREQ: &str = "filter_freq";
    pub const FILTER_QUALITY: &str = "filter_quality";
    pub const FILTER_GAIN: &str = "filter_gain";

    pub const INPUT_GAIN: &str = "input_gain";
    pub const OUTPUT_GAIN: &str = "output_gain";

    pub const PHASER_BYPASS: &str = "phaser_bypass";
    pub const CHORUS_BYPASS: &str = "chorus_bypass";
    pub const OVERDRIVE_BYPASS: &str = "overdrive_bypass";
    pub const LADDER_BYPASS: &str = "ladder_bypass";
    pub const FILTER_BYPASS: &str = "filter_bypass";
}

/// Skew that centers 1 kHz on a 20 Hz to 20 kHz knob.
const FREQ_SKEW: f32 = 0.23;

/// Every parameter, in declaration order.
pub static PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::float(ids::PHASER_RATE, "Phaser Rate", ParamUnit::Hertz, 0.01, 2.0, 1.0),
    ParamDescriptor::float(ids::PHASER_DEPTH, "Phaser Depth", ParamUnit::Percent, 0.0, 1.0, 0.05),
    ParamDescriptor::float(ids::PHASER_CENTER_FREQ, "Phaser Center Freq", ParamUnit::Hertz, 20.0, 20000.0, 1000.0)
        .with_step(1.0)
        .with_skew(FREQ_SKEW),
    ParamDescriptor::float(ids::PHASER_FEEDBACK, "Phaser Feedback", ParamUnit::Percent, -1.0, 1.0, 0.0),
    ParamDescriptor::float(ids::PHASER_MIX, "Phaser Mix", ParamUnit::Percent, 0.0, 1.0, 0.05),
    ParamDescriptor::float(ids::CHORUS_RATE, "Chorus Rate", ParamUnit::Hertz, 0.01, 2.0, 0.2),
    ParamDescriptor::float(ids::CHORUS_DEPTH, "Chorus Depth", ParamUnit::Percent, 0.0, 1.0, 0.05),
    ParamDescriptor::float(ids::CHORUS_CENTER_DELAY, "Chorus Center Delay", ParamUnit::Milliseconds, 1.0, 99.0, 7.0)
        .with_step(1.0),
    ParamDescriptor::float(ids::CHORUS_FEEDBACK, "Chorus Feedback", ParamUnit::Percent, -1.0, 1.0, 0.0),
    ParamDescriptor::float(ids::CHORUS_MIX, "Chorus Mix", ParamUnit::Percent, 0.0, 1.0, 0.05),
    ParamDescriptor::float(ids::OVERDRIVE_DRIVE, "Overdrive", ParamUnit::Multiplier, 1.0, 100.0, 1.0).with_step(0.1),
    ParamDescriptor::choice(ids::LADDER_MODE, "Ladder Filter Mode", &LadderMode::LABELS, 0),
    ParamDescriptor::float(ids::LADDER_CUTOFF, "Ladder Filter Cutoff", ParamUnit::Hertz, 20.0, 20000.0, 20000.0)
        .with_step(0.1)
        .with_skew(FREQ_SKEW),
    ParamDescriptor::float(ids::LADDER_RESONANCE, "Ladder Filter Resonance", ParamUnit::Percent, 0.0, 1.0, 0.0)
        .with_step(0.1),
    ParamDescriptor::float(ids::LADDER_DRIVE, "Ladder Filter Drive", ParamUnit::Multiplier, 1.0, 100.0, 1.0)
        .with_step(0.1),
    ParamDescriptor::choice(ids::FILTER_MODE, "Filter Mode", &FilterMode::LABELS, 0),
    ParamDescriptor::float(ids::FILTER_FREQ, "Filter Freq", ParamUnit::Hertz, 20.0, 20000.0, 1000.0)
        .with_step(1.0)
        .with_skew(FREQ_SKEW),
    ParamDescriptor::float(ids::FILTER_QUALITY, "Filter Quality", ParamUnit::None, 0.1, 10.0, 1.0)
        .with_step(0.05)
        .with_skew(0.29),
    ParamDescriptor::float(ids::FILTER_GAIN, "Filter Gain", ParamUnit::Decibels, -24.0, 24.0, 0.0).with_step(0.5),
    ParamDescriptor::float(ids::INPUT_GAIN, "Input Gain", ParamUnit::Decibels, -12.0, 12.0, 0.0).with_step(0.1),
    ParamDescriptor::float(ids::OUTPUT_GAIN, "Output Gain", ParamUnit::Decibels, -12.0, 12.0, 0.0).with_step(0.1),
    ParamDescriptor::toggle(ids::PHASER_BYPASS, "Phaser Bypass", false),
    ParamDescriptor::toggle(ids::CHORUS_BYPASS, "Chorus Bypass", false),
    ParamDescriptor::toggle(ids::OVERDRIVE_BYPASS, "Overdrive Bypass", false),
    ParamDescriptor::toggle(ids::LADDER_BYPASS, "Ladder Filter Bypass", false),
    ParamDescriptor::toggle(ids::FILTER_BYPASS, "Filter Bypass", false),
];

/// Bypass parameter id of an effect option.
pub const fn bypass_id(option: EffectOption) -> &'static str {
    match option {
        EffectOption::Phaser => ids::PHASER_BYPASS,
        EffectOption::Chorus => ids::CHORUS_BYPASS,
        EffectOption::Overdrive => ids::OVERDRIVE_BYPASS,
        EffectOption::LadderFilter => ids::LADDER_BYPASS,
        EffectOption::ParametricFilter => ids::FILTER_BYPASS,
    }
}

/// True if the smoother bank ramps this parameter.
///
/// Input and output gain are excluded because the gain stages ramp them per
/// sample outside the chunk loop.
pub fn is_smoothed(descriptor: &ParamDescriptor) -> bool {
    descriptor.is_float() && descriptor.id != ids::INPUT_GAIN && descriptor.id != ids::OUTPUT_GAIN
}

/// Resolved indices of every parameter the processor reads.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct ParamIds {
    pub phaser_rate: ParamIndex,
    pub phaser_depth: ParamIndex,
    pub phaser_center_freq: ParamIndex,
    pub phaser_feedback: ParamIndex,
    pub phaser_mix: ParamIndex,
    pub chorus_rate: ParamIndex,
    pub chorus_depth: ParamIndex,
    pub chorus_center_delay: ParamIndex,
    pub chorus_feedback: ParamIndex,
    pub chorus_mix: ParamIndex,
    pub overdrive_drive: ParamIndex,
    pub ladder_mode: ParamIndex,
    pub ladder_cutoff: ParamIndex,
    pub ladder_resonance: ParamIndex,
    pub ladder_drive: ParamIndex,
    pub filter_mode: ParamIndex,
    pub filter_freq: ParamIndex,
    pub filter_quality: ParamIndex,
    pub filter_gain: ParamIndex,
    pub input_gain: ParamIndex,
    pub output_gain: ParamIndex,
    bypass: [ParamIndex; EffectOption::COUNT],
}

impl ParamIds {
    /// Look up every index in `store`.
    pub fn resolve(store: &ParamStore) -> Result<Self, ParamError> {
        let bypass = [
            store.index(bypass_id(EffectOption::ALL[0]))?,
            store.index(bypass_id(EffectOption::ALL[1]))?,
            store.index(bypass_id(EffectOption::ALL[2]))?,
            store.index(bypass_id(EffectOption::ALL[3]))?,
            store.index(bypass_id(EffectOption::ALL[4]))?,
        ];
        Ok(Self {
            phaser_rate: store.index(ids::PHASER_RATE)?,
            phaser_depth: store.index(ids::PHASER_DEPTH)?,
            phaser_center_freq: store.index(ids::PHASER_CENTER_FREQ)?,
            phaser_feedback: store.index(ids::PHASER_FEEDBACK)?,
            phaser_mix: store.index(ids::PHASER_MIX)?,
            chorus_rate: store.index(ids::CHORUS_RATE)?,
            chorus_depth: store.index(ids::CHORUS_DEPTH)?,
            chorus_center_delay: store.index(ids::CHORUS_CENTER_DELAY)?,
            chorus_feedback: store.index(ids::CHORUS_FEEDBACK)?,
            chorus_mix: store.index(ids::CHORUS_MIX)?,
            overdrive_drive: store.index(ids::OVERDRIVE_DRIVE)?,
            ladder_mode: store.index(ids::LADDER_MODE)?,
            ladder_cutoff: store.index(ids::LADDER_CUTOFF)?,
            ladder_resonance: store.index(ids::LADDER_RESONANCE)?,
            ladder_drive: store.index(ids::LADDER_DRIVE)?,
            filter_mode: store.index(ids::FILTER_MODE)?,
            filter_freq: store.index(ids::FILTER_FREQ)?,
            filter_quality: store.index(ids::FILTER_QUALITY)?,
            filter_gain: store.index(ids::FILTER_GAIN)?,
            input_gain: store.index(ids::INPUT_GAIN)?,
            output_gain: store.index(ids::OUTPUT_GAIN)?,
            bypass,
        })
    }

    /// Bypass toggle of an effect option.
    pub fn bypass(&self, option: EffectOption) -> ParamIndex {
        self.bypass[option.index()]
    }
}
