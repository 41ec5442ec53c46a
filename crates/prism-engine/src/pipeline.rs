//! Per-Channel DSP Pipeline.
//!
//! One stateful instance of each effect for a single (mono) channel. Stages
//! are selected by matching on [`EffectOption`], so the hot loop has no
//! virtual calls. A bypassed stage is skipped outright: it costs nothing and
//! its delay lines and filter states stay exactly as they were.

use prism_core::{Effect, LadderMode, Stage};
use prism_effects::{
    Chorus, ChorusParams, FilterMode, FilterSettings, LadderFilter, LadderParams, Overdrive,
    OverdriveParams, ParametricFilter, Phaser, PhaserParams,
};

use crate::layout::ParamIds;
use crate::order::{ChainOrder, EffectOption};
use crate::params::ParamStore;
use crate::smoother::SmootherBank;

/// Per-stage bypass state, indexed by [`EffectOption::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BypassFlags([bool; EffectOption::COUNT]);

impl BypassFlags {
    /// Nothing bypassed.
    pub const NONE: Self = Self([false; EffectOption::COUNT]);

    /// Everything bypassed except `option`.
    pub fn only(option: EffectOption) -> Self {
        let mut flags = [true; EffectOption::COUNT];
        flags[option.index()] = false;
        Self(flags)
    }

    /// True if `option` is bypassed.
    #[inline]
    pub fn is_bypassed(&self, option: EffectOption) -> bool {
        self.0[option.index()]
    }

    /// Set one flag.
    pub fn set(&mut self, option: EffectOption, bypassed: bool) {
        self.0[option.index()] = bypassed;
    }
}

/// Snapshot of every value the stages read for one chunk.
///
/// Floats come from the smoother bank, choices and toggles straight from the
/// store. Both pipelines receive the same snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChainParams {
    /// Phaser settings
    pub phaser: PhaserParams,
    /// Chorus settings
    pub chorus: ChorusParams,
    /// Overdrive settings
    pub overdrive: OverdriveParams,
    /// Ladder filter settings
    pub ladder: LadderParams,
    /// Parametric filter settings
    pub filter: FilterSettings,
    /// Bypass flags
    pub bypass: BypassFlags,
}

impl ChainParams {
    /// Read the current snapshot.
    #[inline]
    pub fn capture(ids: &ParamIds, bank: &SmootherBank, store: &ParamStore) -> Self {
        let mut bypass = BypassFlags::NONE;
        for option in EffectOption::ALL {
            bypass.set(option, store.get_bool(ids.bypass(option)));
        }

        let ladder_mode = LadderMode::from_index(store.get_choice(ids.ladder_mode));
        let filter_mode = FilterMode::from_index(store.get_choice(ids.filter_mode));
        debug_assert!(ladder_mode.is_some(), "ladder_mode choice out of range");
        debug_assert!(filter_mode.is_some(), "filter_mode choice out of range");

        Self {
            phaser: PhaserParams {
                rate_hz: bank.read(ids.phaser_rate),
                depth: bank.read(ids.phaser_depth),
                center_hz: bank.read(ids.phaser_center_freq),
                feedback: bank.read(ids.phaser_feedback),
                mix: bank.read(ids.phaser_mix),
            },
            chorus: ChorusParams {
                rate_hz: bank.read(ids.chorus_rate),
                depth: bank.read(ids.chorus_depth),
                center_delay_ms: bank.read(ids.chorus_center_delay),
                feedback: bank.read(ids.chorus_feedback),
                mix: bank.read(ids.chorus_mix),
            },
            overdrive: OverdriveParams {
                drive: bank.read(ids.overdrive_drive),
            },
            ladder: LadderParams {
                mode: ladder_mode.unwrap_or_default(),
                cutoff_hz: bank.read(ids.ladder_cutoff),
                resonance: bank.read(ids.ladder_resonance),
                drive: bank.read(ids.ladder_drive),
            },
            filter: FilterSettings {
                mode: filter_mode.unwrap_or_default(),
                frequency: bank.read(ids.filter_freq),
                quality: bank.read(ids.filter_quality),
                gain_db: bank.read(ids.filter_gain),
            },
            bypass,
        }
    }
}

/// The five stages for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPipeline {
    phaser: Phaser,
    chorus: Chorus,
    overdrive: Overdrive,
    ladder: LadderFilter,
    filter: ParametricFilter,
    sample_rate: f32,
    max_block_size: usize,
}

impl ChannelPipeline {
    /// Pipeline with every stage at its default settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phaser: Phaser::new(sample_rate),
            chorus: Chorus::new(sample_rate),
            overdrive: Overdrive::new(sample_rate),
            ladder: LadderFilter::new(sample_rate),
            filter: ParametricFilter::new(sample_rate),
            sample_rate,
            max_block_size: 0,
        }
    }

    /// Set the sample rate on every stage and clear all state.
    ///
    /// The overdrive stage re-pins its internal ladder open here, so it acts
    /// as a saturator rather than a filter.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.phaser.prepare(sample_rate);
        self.chorus.prepare(sample_rate);
        self.overdrive.prepare(sample_rate);
        self.ladder.prepare(sample_rate);
        self.filter.prepare(sample_rate);
    }

    /// Push a snapshot into every stage.
    ///
    /// The parametric filter recomputes coefficients only when its settings
    /// changed since the previous update.
    #[inline]
    pub fn update(&mut self, params: &ChainParams) {
        self.phaser.apply(&params.phaser);
        self.chorus.apply(&params.chorus);
        self.overdrive.apply(&params.overdrive);
        self.ladder.apply(&params.ladder);
        self.filter.apply(&params.filter);
    }

    /// Run `block` through the stages in `order`, skipping bypassed ones.
    #[inline]
    pub fn process(&mut self, block: &mut [f32], order: &ChainOrder, bypass: &BypassFlags) {
        for option in order.iter() {
            if bypass.is_bypassed(option) {
                continue;
            }
            match option {
                EffectOption::Phaser => self.phaser.process_block_inplace(block),
                EffectOption::Chorus => self.chorus.process_block_inplace(block),
                EffectOption::Overdrive => self.overdrive.process_block_inplace(block),
                EffectOption::LadderFilter => self.ladder.process_block_inplace(block),
                EffectOption::ParametricFilter => self.filter.process_block_inplace(block),
            }
        }
    }

    /// Clear every stage's history without touching settings.
    pub fn reset(&mut self) {
        self.phaser.reset();
        self.chorus.reset();
        self.overdrive.reset();
        self.ladder.reset();
        self.filter.reset();
    }

    /// Sample rate of the last prepare.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block announced by the last prepare.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Phaser stage.
    pub fn phaser(&self) -> &Phaser {
        &self.phaser
    }

    /// Chorus stage.
    pub fn chorus(&self) -> &Chorus {
        &self.chorus
    }

    /// Overdrive stage.
    pub fn overdrive(&self) -> &Overdrive {
        &self.overdrive
    }

    /// Ladder filter stage.
    pub fn ladder(&self) -> &LadderFilter {
        &self.ladder
    }

    /// Parametric filter stage.
    pub fn filter(&self) -> &ParametricFilter {
        &self.filter
    }
}
