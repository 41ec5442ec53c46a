//! Parameter Store: the canonical value of every control.
//!
//! Values live in a flat vector of `AtomicU32` cells holding `f32` bit
//! patterns. Declaration happens once at startup through `&mut self`; after
//! the store is wrapped in an `Arc`, both threads read and write through
//! `&self` with Acquire/Release ordering. Each cell is an independent scalar,
//! so a reader racing a writer sees either the old or the new value.
//!
//! The store neither validates nor smooths. Range clamping happens at the
//! control-surface boundary ([`Controller`](crate::Controller)), smoothing in
//! the [`SmootherBank`](crate::SmootherBank).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use prism_core::{ParamDescriptor, ParamKind};

use crate::error::ParamError;
use crate::layout::PARAMETERS;

/// Stable handle to a declared parameter.
///
/// Handed out by [`ParamStore::declare`] and valid for the store's lifetime.
/// The audio thread addresses parameters only through these indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamIndex(usize);

impl ParamIndex {
    /// Position in declaration order.
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Typed cells for every declared parameter.
#[derive(Debug, Default)]
pub struct ParamStore {
    descriptors: Vec<ParamDescriptor>,
    values: Vec<AtomicU32>,
    by_id: HashMap<&'static str, ParamIndex>,
}

impl ParamStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every parameter of the processor layout declared.
    pub fn with_layout() -> Result<Self, ParamError> {
        let mut store = Self::new();
        for descriptor in PARAMETERS {
            store.declare(*descriptor)?;
        }
        Ok(store)
    }

    /// Register a parameter and initialize its cell to the default.
    ///
    /// Declaring an id twice is a configuration error.
    pub fn declare(&mut self, descriptor: ParamDescriptor) -> Result<ParamIndex, ParamError> {
        if self.by_id.contains_key(descriptor.id) {
            return Err(ParamError::Duplicate(descriptor.id.to_owned()));
        }
        let index = ParamIndex(self.descriptors.len());
        tracing::debug!(
            id = descriptor.id,
            index = index.0,
            default = descriptor.default,
            "declare_param"
        );
        self.values.push(AtomicU32::new(descriptor.default.to_bits()));
        self.by_id.insert(descriptor.id, index);
        self.descriptors.push(descriptor);
        Ok(index)
    }

    /// Index for `id`, if declared.
    pub fn lookup(&self, id: &str) -> Option<ParamIndex> {
        self.by_id.get(id).copied()
    }

    /// Index for `id`, or [`ParamError::Unknown`].
    pub fn index(&self, id: &str) -> Result<ParamIndex, ParamError> {
        self.lookup(id).ok_or_else(|| ParamError::Unknown(id.to_owned()))
    }

    /// Live value.
    #[inline]
    pub fn get(&self, index: ParamIndex) -> f32 {
        f32::from_bits(self.values[index.0].load(Ordering::Acquire))
    }

    /// Live value read as a toggle.
    #[inline]
    pub fn get_bool(&self, index: ParamIndex) -> bool {
        self.get(index) >= 0.5
    }

    /// Live value read as a choice index.
    #[inline]
    pub fn get_choice(&self, index: ParamIndex) -> usize {
        let value = self.get(index);
        if value.is_finite() && value > 0.0 {
            (value + 0.5) as usize
        } else {
            0
        }
    }

    /// Store `value` as-is. Visible to the next [`get`](Self::get).
    #[inline]
    pub fn set(&self, index: ParamIndex, value: f32) {
        self.values[index.0].store(value.to_bits(), Ordering::Release);
    }

    /// Descriptor for a declared parameter.
    pub fn descriptor(&self, index: ParamIndex) -> &ParamDescriptor {
        &self.descriptors[index.0]
    }

    /// Descriptor for `id`, if declared.
    pub fn descriptor_by_id(&self, id: &str) -> Option<&ParamDescriptor> {
        self.lookup(id).map(|index| self.descriptor(index))
    }

    /// Choice check used before writing a choice by index.
    pub fn choice_labels(&self, index: ParamIndex) -> Result<&'static [&'static str], ParamError> {
        let descriptor = self.descriptor(index);
        match descriptor.kind {
            ParamKind::Choice(labels) => Ok(labels),
            _ => Err(ParamError::NotChoice(descriptor.id.to_owned())),
        }
    }

    /// Every parameter with its index, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamIndex, &ParamDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (ParamIndex(i), descriptor))
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Write every parameter's default back into its cell.
    pub fn reset_to_defaults(&self) {
        for (index, descriptor) in self.iter() {
            self.set(index, descriptor.default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::ParamUnit;
    use std::sync::Arc;

    const GAIN: ParamDescriptor = ParamDescriptor::float("gain", "Gain", ParamUnit::Decibels, -12.0, 12.0, 0.0);
    const MODE: ParamDescriptor = ParamDescriptor::choice("mode", "Mode", &["A", "B", "C"], 1);

    #[test]
    fn declare_initializes_to_default() {
        let mut store = ParamStore::new();
        let mode = store.declare(MODE).unwrap();
        assert_eq!(store.get(mode), 1.0);
        assert_eq!(store.get_choice(mode), 1);
        assert_eq!(store.lookup("mode"), Some(mode));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = ParamStore::new();
        store.declare(GAIN).unwrap();
        assert_eq!(store.declare(GAIN), Err(ParamError::Duplicate("gain".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_is_visible_to_next_get_without_clamping() {
        let mut store = ParamStore::new();
        let gain = store.declare(GAIN).unwrap();
        store.set(gain, 40.0);
        assert_eq!(store.get(gain), 40.0);
    }

    #[test]
    fn unknown_id_errors() {
        let store = ParamStore::new();
        assert_eq!(store.index("missing"), Err(ParamError::Unknown("missing".into())));
    }

    #[test]
    fn choice_labels_rejects_float() {
        let mut store = ParamStore::new();
        let gain = store.declare(GAIN).unwrap();
        let mode = store.declare(MODE).unwrap();
        assert_eq!(store.choice_labels(mode).unwrap(), &["A", "B", "C"]);
        assert_eq!(store.choice_labels(gain), Err(ParamError::NotChoice("gain".into())));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = ParamStore::with_layout().unwrap();
        for (index, _) in store.iter() {
            store.set(index, 0.75);
        }
        store.reset_to_defaults();
        for (index, descriptor) in store.iter() {
            assert_eq!(store.get(index), descriptor.default, "{}", descriptor.id);
        }
    }

    #[test]
    fn writes_from_another_thread_are_observed() {
        let mut store = ParamStore::new();
        let gain = store.declare(GAIN).unwrap();
        let store = Arc::new(store);

        let writer = Arc::clone(&store);
        std::thread::spawn(move || writer.set(gain, -6.0)).join().unwrap();
        assert_eq!(store.get(gain), -6.0);
    }
}
