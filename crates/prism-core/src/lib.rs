//! Prism Core - DSP primitives for the prism effect chain
//!
//! This crate provides the building blocks the effect stages are made of,
//! designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Mono stateful stream transform
//! - [`Stage`] - An effect driven by a typed parameter snapshot
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Static metadata: id, range, step, skew, kind
//! - [`LinearSmoothedParam`] - Linear ramp for click-free control changes
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//! - [`BiquadCoefficients`] - Comparable, cacheable coefficient set
//! - [`Ladder`] - Transistor ladder filter with drive
//!
//! ## Delay & Modulation
//!
//! - [`InterpolatedDelay`] - Variable-length delay with interpolation
//! - [`Lfo`] - Sine low-frequency oscillator
//!
//! ## Gain
//!
//! - [`GainStage`] - Ramped stereo gain with a decibel interface
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`soft_clip`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! prism-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Comparable state**: DSP structs derive `PartialEq` so callers can
//!   assert that untouched state stays untouched

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod gain;
pub mod ladder;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;

// Re-export main types at crate root
pub use biquad::{
    Biquad, BiquadCoefficients, allpass_coefficients, bandpass_coefficients, notch_coefficients,
    peaking_eq_coefficients,
};
pub use delay::InterpolatedDelay;
pub use effect::{Effect, Stage};
pub use gain::GainStage;
pub use ladder::{Ladder, LadderMode};
pub use lfo::Lfo;
pub use math::{SILENCE_DB, db_to_linear, flush_denormal, linear_to_db, ms_to_samples, soft_clip, wet_dry_mix};
pub use param::LinearSmoothedParam;
pub use param_info::{ParamDescriptor, ParamKind, ParamUnit};
