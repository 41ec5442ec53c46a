//! Persisted state blob.
//!
//! JSON with every parameter value keyed by id, the last committed order as
//! integer codes, and the selected tab by display name:
//!
//! ```json
//! { "version": 1,
//!   "params": { "filter_freq": 1000.0, "phaser_mix": 0.05 },
//!   "order": [0, 1, 2, 3, 4],
//!   "selected_tab": "Phaser" }
//! ```
//!
//! [`PersistedState::from_bytes`] rejects unparsable JSON and unknown
//! versions. Inside a readable blob each field degrades on its own: a
//! mistyped parameter value, order or tab is dropped and later resolves to
//! its default while the rest still restores. The tolerant path used by
//! [`Controller::restore_state`](crate::Controller::restore_state) never
//! fails.

use std::collections::BTreeMap;

use prism_core::{ParamDescriptor, ParamKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::StateError;
use crate::order::{ChainOrder, EffectOption};
use crate::params::ParamStore;

/// Current format version.
pub const STATE_VERSION: u32 = 1;

/// Decoded state blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Format version
    pub version: u32,
    /// Parameter values by id
    #[serde(default, deserialize_with = "lenient_params")]
    pub params: BTreeMap<String, f32>,
    /// Effect codes in slot order
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_order")]
    pub order: Option<Vec<u32>>,
    /// Display name of the selected tab
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_tab")]
    pub selected_tab: Option<String>,
}

impl Default for PersistedState {
    /// An empty state: every parameter at its default, identity order.
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            params: BTreeMap::new(),
            order: None,
            selected_tab: None,
        }
    }
}

impl PersistedState {
    /// Snapshot the store, the committed order and the selected tab.
    pub fn capture(store: &ParamStore, order: &ChainOrder, selected_tab: EffectOption) -> Self {
        Self {
            version: STATE_VERSION,
            params: store
                .iter()
                .map(|(index, descriptor)| (descriptor.id.to_owned(), store.get(index)))
                .collect(),
            order: Some(order.to_indices()),
            selected_tab: Some(selected_tab.name().to_owned()),
        }
    }

    /// Encode as pretty-printed JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode, rejecting malformed JSON and unknown versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let state: Self = serde_json::from_slice(bytes)?;
        if state.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(state.version));
        }
        Ok(state)
    }

    /// Decode, falling back to [`PersistedState::default`] on any error.
    pub fn from_bytes_lossy(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unreadable state blob, using defaults");
            Self::default()
        })
    }

    /// Stored order, or identity if absent or not a permutation.
    pub fn resolved_order(&self) -> ChainOrder {
        let Some(indices) = &self.order else {
            return ChainOrder::identity();
        };
        ChainOrder::try_from_indices(indices).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid stored order, using identity");
            ChainOrder::identity()
        })
    }

    /// Stored tab, or Phaser if absent or unknown.
    pub fn resolved_tab(&self) -> EffectOption {
        self.selected_tab
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(EffectOption::Phaser)
    }

    /// Write every stored value into `store`.
    ///
    /// Unknown ids are ignored, missing ids take their default, floats are
    /// clamped to range, choices and toggles are rounded.
    pub fn apply_params(&self, store: &ParamStore) {
        for (index, descriptor) in store.iter() {
            let value = self
                .params
                .get(descriptor.id)
                .map_or(descriptor.default, |&v| restore_value(descriptor, v));
            store.set(index, value);
        }
    }

    /// Parameters whose stored value differs from the default.
    pub fn non_default_params<'a>(&'a self, store: &'a ParamStore) -> impl Iterator<Item = (&'a str, f32)> + 'a {
        store.iter().filter_map(|(_, descriptor)| {
            self.params
                .get(descriptor.id)
                .filter(|&&v| v != descriptor.default)
                .map(|&v| (descriptor.id, v))
        })
    }
}

fn lenient_params<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<String, f32>, D::Error> {
    let entries = match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries,
        Value::Null => return Ok(BTreeMap::new()),
        _ => {
            tracing::warn!("stored params are not an object, using defaults");
            return Ok(BTreeMap::new());
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|(id, value)| match value.as_f64() {
            Some(v) => Some((id, v as f32)),
            None => {
                tracing::warn!(id = %id, "unreadable stored value, using default");
                None
            }
        })
        .collect())
}

fn lenient_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let codes = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_u64().and_then(|code| u32::try_from(code).ok()))
            .collect::<Option<Vec<u32>>>()
    });
    if codes.is_none() {
        tracing::warn!(order = %value, "unreadable stored order, using identity");
    }
    Ok(codes)
}

fn lenient_tab<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(name) => Ok(Some(name)),
        Value::Null => Ok(None),
        other => {
            tracing::warn!(tab = %other, "unreadable stored tab, using Phaser");
            Ok(None)
        }
    }
}

fn restore_value(descriptor: &ParamDescriptor, value: f32) -> f32 {
    if !value.is_finite() {
        return descriptor.default;
    }
    match descriptor.kind {
        ParamKind::Float => descriptor.clamp(value),
        ParamKind::Choice(_) | ParamKind::Bool => descriptor.sanitize(value),
    }
}
