//! Stereo Orchestrator.
//!
//! [`Processor`] is the audio-thread half of the engine and the only thing
//! the host callback touches. Each [`process_block`](Processor::process_block):
//!
//! 1. drains the Order Channel and adopts the newest order, if any;
//! 2. ramps the input gain and pushes an input level snapshot;
//! 3. walks the block in chunks of at most `max_chunk_size` samples,
//!    advancing the smoothers by each chunk's length before updating and
//!    running both channel pipelines on it;
//! 4. ramps the output gain and pushes an output level snapshot.
//!
//! Nothing in that path allocates, locks, blocks or logs. All buffers are
//! sized in [`prepare_to_play`](Processor::prepare_to_play).

use std::sync::Arc;

use prism_core::GainStage;

use crate::config::EngineConfig;
use crate::layout::ParamIds;
use crate::metering::{LevelSender, LevelSnapshot};
use crate::order::{ChainOrder, OrderReceiver};
use crate::params::ParamStore;
use crate::pipeline::{ChainParams, ChannelPipeline};
use crate::smoother::SmootherBank;

/// Real-time half of the engine. Built by [`create`](crate::create).
#[derive(Debug)]
pub struct Processor {
    store: Arc<ParamStore>,
    ids: ParamIds,
    bank: SmootherBank,
    left: ChannelPipeline,
    right: ChannelPipeline,
    input_gain: GainStage,
    output_gain: GainStage,
    order: ChainOrder,
    orders: OrderReceiver,
    input_levels: LevelSender,
    output_levels: LevelSender,
    config: EngineConfig,
    /// Deinterleave space for [`process_interleaved`](Self::process_interleaved).
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
}

impl Processor {
    pub(crate) fn new(
        store: Arc<ParamStore>,
        ids: ParamIds,
        orders: OrderReceiver,
        input_levels: LevelSender,
        output_levels: LevelSender,
        config: EngineConfig,
    ) -> Self {
        let bank = SmootherBank::new(&store);
        let (sample_rate, max_block_size) = (config.sample_rate, config.max_block_size);
        let mut processor = Self {
            store,
            ids,
            bank,
            left: ChannelPipeline::new(config.sample_rate),
            right: ChannelPipeline::new(config.sample_rate),
            input_gain: GainStage::new(),
            output_gain: GainStage::new(),
            order: ChainOrder::identity(),
            orders,
            input_levels,
            output_levels,
            scratch_left: Vec::new(),
            scratch_right: Vec::new(),
            config,
        };
        processor.prepare_to_play(sample_rate, max_block_size);
        processor
    }

    /// Prepare for playback at `sample_rate` with blocks of up to
    /// `max_block_size` frames.
    ///
    /// Clears all DSP state and jumps every smoother and gain to the store's
    /// current values. Allocates; call it off the audio thread or while the
    /// stream is stopped.
    pub fn prepare_to_play(&mut self, sample_rate: f32, max_block_size: usize) {
        let max_block_size = max_block_size.max(1);
        tracing::debug!(sample_rate, max_block_size, "prepare_to_play");

        self.config.sample_rate = sample_rate;
        self.config.max_block_size = max_block_size;

        self.bank.reset(sample_rate, self.config.ramp_seconds);
        self.bank.initialize(&self.store);

        for pipeline in [&mut self.left, &mut self.right] {
            pipeline.prepare(sample_rate, max_block_size);
        }

        self.input_gain.prepare(sample_rate, self.config.ramp_seconds);
        self.input_gain.set_gain_db_immediate(self.store.get(self.ids.input_gain));
        self.output_gain.prepare(sample_rate, self.config.ramp_seconds);
        self.output_gain.set_gain_db_immediate(self.store.get(self.ids.output_gain));

        let params = ChainParams::capture(&self.ids, &self.bank, &self.store);
        self.left.update(&params);
        self.right.update(&params);

        self.scratch_left = vec![0.0; max_block_size];
        self.scratch_right = vec![0.0; max_block_size];
    }

    /// Process one planar stereo block in place.
    ///
    /// Handles `min(left.len(), right.len())` frames.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let (left, right) = (&mut left[..frames], &mut right[..frames]);

        if let Some(order) = self.orders.drain() {
            self.order = order;
        }

        self.input_gain.set_gain_db(self.store.get(self.ids.input_gain));
        self.input_gain.process_stereo(left, right);
        self.input_levels.push(LevelSnapshot::measure(left, right));

        self.bank.retarget_from(&self.store);
        let chunk = self.config.max_chunk_size.max(1);
        for (l, r) in left.chunks_mut(chunk).zip(right.chunks_mut(chunk)) {
            self.bank.advance(l.len());
            let params = ChainParams::capture(&self.ids, &self.bank, &self.store);
            self.left.update(&params);
            self.right.update(&params);
            self.left.process(l, &self.order, &params.bypass);
            self.right.process(r, &self.order, &params.bypass);
        }

        self.output_gain.set_gain_db(self.store.get(self.ids.output_gain));
        self.output_gain.process_stereo(left, right);
        self.output_levels.push(LevelSnapshot::measure(left, right));
    }

    /// Process an interleaved stereo buffer (`L R L R ...`) in place.
    ///
    /// Runs in sub-blocks of at most `max_block_size` frames; each sub-block
    /// is one [`process_block`](Self::process_block) call. A trailing odd
    /// sample is left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        let mut left = std::mem::take(&mut self.scratch_left);
        let mut right = std::mem::take(&mut self.scratch_right);
        let frames_per_pass = left.len().min(right.len()).max(1);

        for frames in buffer.chunks_mut(frames_per_pass * 2) {
            let n = frames.len() / 2;
            if n == 0 {
                continue;
            }
            for (i, pair) in frames.chunks_exact(2).enumerate() {
                left[i] = pair[0];
                right[i] = pair[1];
            }
            self.process_block(&mut left[..n], &mut right[..n]);
            for (i, pair) in frames.chunks_exact_mut(2).enumerate() {
                pair[0] = left[i];
                pair[1] = right[i];
            }
        }

        self.scratch_left = left;
        self.scratch_right = right;
    }

    /// Clear DSP history in both pipelines. Settings and smoothers are kept.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Order currently in effect.
    pub fn order(&self) -> ChainOrder {
        self.order
    }

    /// Sample rate of the last prepare.
    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Left-channel pipeline.
    pub fn left(&self) -> &ChannelPipeline {
        &self.left
    }

    /// Right-channel pipeline.
    pub fn right(&self) -> &ChannelPipeline {
        &self.right
    }

    /// Smoother bank.
    pub fn smoothers(&self) -> &SmootherBank {
        &self.bank
    }
}
