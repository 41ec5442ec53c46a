//! Parameter Smoother Bank.
//!
//! One [`LinearSmoothedParam`] per smoothed float parameter, addressed by the
//! same [`ParamIndex`] the store uses. The DSP side only ever sees
//! [`read`](SmootherBank::read), which is the ramped value, never the raw
//! target sitting in the store.

use prism_core::LinearSmoothedParam;

use crate::layout::is_smoothed;
use crate::params::{ParamIndex, ParamStore};

/// Marker for store slots that have no smoother.
const NOT_SMOOTHED: usize = usize::MAX;

/// Smoothed runtime values for the float parameters of a store.
#[derive(Debug, Clone)]
pub struct SmootherBank {
    members: Vec<ParamIndex>,
    smoothers: Vec<LinearSmoothedParam>,
    /// Store index to position in `smoothers`, `NOT_SMOOTHED` for non-members.
    slots: Vec<usize>,
}

impl SmootherBank {
    /// Bank covering every smoothed parameter of `store`, seeded with the
    /// store's current values.
    pub fn new(store: &ParamStore) -> Self {
        let mut members = Vec::new();
        let mut smoothers = Vec::new();
        let mut slots = vec![NOT_SMOOTHED; store.len()];

        for (index, descriptor) in store.iter() {
            if is_smoothed(descriptor) {
                slots[index.get()] = smoothers.len();
                members.push(index);
                smoothers.push(LinearSmoothedParam::new(store.get(index)));
            }
        }

        Self {
            members,
            smoothers,
            slots,
        }
    }

    /// Set the ramp length to `ramp_seconds * sample_rate` samples.
    ///
    /// Any running ramp is finished first.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        for smoother in &mut self.smoothers {
            smoother.reset(sample_rate, ramp_seconds);
        }
    }

    /// Jump every smoother to the store's current value.
    pub fn initialize(&mut self, store: &ParamStore) {
        for (smoother, &index) in self.smoothers.iter_mut().zip(&self.members) {
            smoother.set_immediate(store.get(index));
        }
    }

    /// Begin a ramp from the current value toward `value`.
    ///
    /// Ignored for parameters outside the bank.
    #[inline]
    pub fn retarget(&mut self, index: ParamIndex, value: f32) {
        if let Some(slot) = self.slot(index) {
            self.smoothers[slot].set_target(value);
        }
    }

    /// Retarget every member to its raw value in `store`.
    #[inline]
    pub fn retarget_from(&mut self, store: &ParamStore) {
        for (smoother, &index) in self.smoothers.iter_mut().zip(&self.members) {
            smoother.set_target(store.get(index));
        }
    }

    /// Move every smoother `samples` samples along its ramp.
    #[inline]
    pub fn advance(&mut self, samples: usize) {
        let samples = u32::try_from(samples).unwrap_or(u32::MAX);
        for smoother in &mut self.smoothers {
            smoother.skip(samples);
        }
    }

    /// Smoothed value of a member parameter.
    ///
    /// Non-members read as `0.0`.
    #[inline]
    pub fn read(&self, index: ParamIndex) -> f32 {
        debug_assert!(self.contains(index), "parameter {index:?} is not smoothed");
        self.slot(index).map_or(0.0, |slot| self.smoothers[slot].get())
    }

    /// Target a member is ramping toward.
    pub fn target(&self, index: ParamIndex) -> Option<f32> {
        self.slot(index).map(|slot| self.smoothers[slot].target())
    }

    /// True if `index` has a smoother.
    pub fn contains(&self, index: ParamIndex) -> bool {
        self.slot(index).is_some()
    }

    /// True once every ramp has completed.
    pub fn is_settled(&self) -> bool {
        self.smoothers.iter().all(LinearSmoothedParam::is_settled)
    }

    /// Number of smoothed parameters.
    pub fn len(&self) -> usize {
        self.smoothers.len()
    }

    /// True if the bank is empty.
    pub fn is_empty(&self) -> bool {
        self.smoothers.is_empty()
    }

    #[inline]
    fn slot(&self, index: ParamIndex) -> Option<usize> {
        match self.slots.get(index.get()) {
            Some(&slot) if slot != NOT_SMOOTHED => Some(slot),
            _ => None,
        }
    }
}
