//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! yields a working 48 kHz setup.
//!
//! ```toml
//! sample_rate = 44100.0
//! max_block_size = 1024
//! ramp_seconds = 0.05
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fifo::DEFAULT_CAPACITY;

/// Setup values for [`create`](crate::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz
    pub sample_rate: f32,
    /// Largest block the host will pass to `process_block`
    pub max_block_size: usize,
    /// Parameter and gain ramp length in seconds
    pub ramp_seconds: f32,
    /// Largest sub-block between smoother updates
    pub max_chunk_size: usize,
    /// Order Channel capacity
    pub order_capacity: usize,
    /// Capacity of each Level Channel
    pub level_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            max_block_size: 512,
            ramp_seconds: 0.05,
            max_chunk_size: 64,
            order_capacity: DEFAULT_CAPACITY,
            level_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::invalid(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::invalid("max_block_size must be at least 1"));
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::invalid("max_chunk_size must be at least 1"));
        }
        if !(self.ramp_seconds.is_finite() && self.ramp_seconds >= 0.0) {
            return Err(ConfigError::invalid(format!(
                "ramp_seconds must be finite and non-negative, got {}",
                self.ramp_seconds
            )));
        }
        if self.order_capacity == 0 || self.level_capacity == 0 {
            return Err(ConfigError::invalid("channel capacities must be at least 1"));
        }
        Ok(())
    }

    /// Same config at another sample rate.
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Same config with another maximum block size.
    #[must_use]
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }
}
