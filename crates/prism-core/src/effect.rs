//! Core Effect trait and the parameter-snapshot contract.
//!
//! The [`Effect`] trait is the stream-transform half of every stage: a mono,
//! stateful, allocation-free sample processor. [`Stage`] adds the other half,
//! a typed parameter snapshot pushed into the effect once per processing
//! chunk. Together they form the uniform capability set used by the chain
//! runner: prepare (via [`Effect::set_sample_rate`] + [`Effect::reset`]),
//! parameter update, in-place processing and reset.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: stereo is built from two independent instances.
//! - **Snapshot parameters**: effects never read shared parameter state
//!   themselves. Whoever owns the effect builds a `Params` value and
//!   hands it over through [`Stage::apply`].
//! - **No allocations**: every method is callable from the audio thread.

/// Core trait for all audio effects.
///
/// # Example
///
/// ```rust
/// use prism_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample.
    ///
    /// For effects with internal state (filters, delays, etc.), this advances
    /// the state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in-place.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Effects recalculate any sample-rate-dependent state here (filter
    /// coefficients, delay lengths in samples, LFO increments).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay lines, filter history) without touching
    /// parameters.
    fn reset(&mut self);
}

/// An [`Effect`] driven by a typed parameter snapshot.
///
/// `apply` is called once per processing chunk with the current smoothed
/// values. Implementations must be cheap when the snapshot has not changed.
pub trait Stage: Effect {
    /// Plain-data parameter set for this stage.
    type Params: Copy + PartialEq + Default;

    /// Push a new parameter snapshot into the effect.
    fn apply(&mut self, params: &Self::Params);

    /// Prepare for playback: set the sample rate and clear history.
    fn prepare(&mut self, sample_rate: f32) {
        self.set_sample_rate(sample_rate);
        self.reset();
    }
}
