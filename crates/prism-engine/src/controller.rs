//! Control-thread half of the engine.
//!
//! [`Controller`] is the control surface's handle: parameter edits go
//! straight into the shared store (clamped here, at the boundary), orders go
//! through the Order Channel, and meter readings are polled from the Level
//! Channels. It also owns the state that only the control side cares about:
//! the last committed order and the selected tab.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{OrderError, ParamError, Result, StateError};
use crate::layout::{ParamIds, bypass_id};
use crate::metering::{LevelReceiver, LevelSnapshot, level_channel};
use crate::order::{ChainOrder, EffectOption, OrderSender, order_channel};
use crate::params::ParamStore;
use crate::processor::Processor;
use crate::state::PersistedState;

/// Build a connected [`Processor`] and [`Controller`].
///
/// The processor is prepared at `config.sample_rate` and
/// `config.max_block_size` and can be moved to the audio thread right away.
///
/// ```rust
/// use prism_engine::{EngineConfig, create};
///
/// let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
/// controller.set_param("input_gain", -6.0).unwrap();
///
/// let mut left = vec![0.5; 256];
/// let mut right = vec![0.5; 256];
/// processor.process_block(&mut left, &mut right);
/// assert!(controller.poll_input_level().is_some());
/// ```
pub fn create(config: EngineConfig) -> Result<(Processor, Controller)> {
    config.validate()?;

    let store = Arc::new(ParamStore::with_layout()?);
    let ids = ParamIds::resolve(&store)?;
    let (order_tx, order_rx) = order_channel(config.order_capacity);
    let (input_tx, input_rx) = level_channel(config.level_capacity);
    let (output_tx, output_rx) = level_channel(config.level_capacity);

    let processor = Processor::new(Arc::clone(&store), ids, order_rx, input_tx, output_tx, config);
    let controller = Controller {
        store,
        orders: order_tx,
        input_levels: input_rx,
        output_levels: output_rx,
        committed: ChainOrder::identity(),
        selected_tab: EffectOption::Phaser,
        dropped_orders: 0,
    };
    Ok((processor, controller))
}

/// Control-thread handle. Built by [`create`].
#[derive(Debug)]
pub struct Controller {
    store: Arc<ParamStore>,
    orders: OrderSender,
    input_levels: LevelReceiver,
    output_levels: LevelReceiver,
    committed: ChainOrder,
    selected_tab: EffectOption,
    dropped_orders: u64,
}

impl Controller {
    /// Set a parameter by id, clamped and snapped to its range.
    ///
    /// Returns the value actually stored.
    pub fn set_param(&self, id: &str, value: f32) -> std::result::Result<f32, ParamError> {
        let index = self.store.index(id)?;
        let value = self.store.descriptor(index).sanitize(value);
        self.store.set(index, value);
        Ok(value)
    }

    /// Set a parameter from a knob position in `[0, 1]`.
    pub fn set_param_normalized(&self, id: &str, normalized: f32) -> std::result::Result<f32, ParamError> {
        let index = self.store.index(id)?;
        let descriptor = self.store.descriptor(index);
        let value = descriptor.sanitize(descriptor.denormalize(normalized));
        self.store.set(index, value);
        Ok(value)
    }

    /// Current raw value of a parameter.
    pub fn param(&self, id: &str) -> std::result::Result<f32, ParamError> {
        Ok(self.store.get(self.store.index(id)?))
    }

    /// Current value as a knob position in `[0, 1]`.
    pub fn param_normalized(&self, id: &str) -> std::result::Result<f32, ParamError> {
        let index = self.store.index(id)?;
        Ok(self.store.descriptor(index).normalize(self.store.get(index)))
    }

    /// Bypass or engage one stage.
    pub fn set_bypass(&self, option: EffectOption, bypassed: bool) {
        if let Some(index) = self.store.lookup(bypass_id(option)) {
            self.store.set(index, if bypassed { 1.0 } else { 0.0 });
        }
    }

    /// True if `option` is bypassed.
    pub fn is_bypassed(&self, option: EffectOption) -> bool {
        self.store
            .lookup(bypass_id(option))
            .is_some_and(|index| self.store.get_bool(index))
    }

    /// Select a choice by index, clamped to the label count.
    pub fn set_choice(&self, id: &str, choice: usize) -> std::result::Result<usize, ParamError> {
        let index = self.store.index(id)?;
        let labels = self.store.choice_labels(index)?;
        let choice = choice.min(labels.len().saturating_sub(1));
        self.store.set(index, choice as f32);
        Ok(choice)
    }

    /// Selected choice index of a choice parameter.
    pub fn choice(&self, id: &str) -> std::result::Result<usize, ParamError> {
        let index = self.store.index(id)?;
        self.store.choice_labels(index)?;
        Ok(self.store.get_choice(index))
    }

    /// Every parameter back to its default. The order is left alone.
    pub fn reset_to_defaults(&self) {
        self.store.reset_to_defaults();
    }

    /// Remember `order` as committed and send it to the audio thread.
    ///
    /// Returns `false` if the Order Channel was full; the order is still
    /// remembered and will be sent with the next commit or restore.
    pub fn commit_order(&mut self, order: ChainOrder) -> bool {
        self.committed = order;
        let sent = self.orders.push(order);
        if !sent {
            self.dropped_orders += 1;
            tracing::warn!(%order, dropped = self.dropped_orders, "order channel full, order dropped");
        }
        sent
    }

    /// Move the stage at slot `from` to slot `to` and commit the result.
    pub fn move_effect(&mut self, from: usize, to: usize) -> std::result::Result<bool, OrderError> {
        let order = self.committed.moved(from, to)?;
        Ok(self.commit_order(order))
    }

    /// Last committed order.
    pub fn order(&self) -> ChainOrder {
        self.committed
    }

    /// Orders dropped on a full channel so far.
    pub fn dropped_orders(&self) -> u64 {
        self.dropped_orders
    }

    /// Newest input level, if any block ran since the last poll.
    pub fn poll_input_level(&mut self) -> Option<LevelSnapshot> {
        self.input_levels.latest()
    }

    /// Newest output level, if any block ran since the last poll.
    pub fn poll_output_level(&mut self) -> Option<LevelSnapshot> {
        self.output_levels.latest()
    }

    /// Tab the control surface last showed.
    pub fn selected_tab(&self) -> EffectOption {
        self.selected_tab
    }

    /// Remember the tab the control surface shows.
    pub fn select_tab(&mut self, tab: EffectOption) {
        self.selected_tab = tab;
    }

    /// Serialize parameters, committed order and tab.
    pub fn save_state(&self) -> std::result::Result<Vec<u8>, StateError> {
        self.capture_state().to_bytes()
    }

    /// Snapshot of the current state.
    pub fn capture_state(&self) -> PersistedState {
        PersistedState::capture(&self.store, &self.committed, self.selected_tab)
    }

    /// Restore from a blob written by [`save_state`](Self::save_state).
    ///
    /// Never fails: unreadable parts fall back to defaults. The restored
    /// order is committed so the audio thread picks it up on its next block.
    pub fn restore_state(&mut self, bytes: &[u8]) {
        let state = PersistedState::from_bytes_lossy(bytes);
        self.apply_state(&state);
    }

    /// Apply an already decoded state.
    pub fn apply_state(&mut self, state: &PersistedState) {
        state.apply_params(&self.store);
        self.selected_tab = state.resolved_tab();
        let order = state.resolved_order();
        tracing::info!(%order, tab = %self.selected_tab, params = state.params.len(), "state restored");
        self.commit_order(order);
    }

    /// The shared parameter store.
    pub fn store(&self) -> &ParamStore {
        &self.store
    }
}
