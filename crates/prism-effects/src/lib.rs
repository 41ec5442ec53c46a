//! Prism Effects - the five stages of the prism chain
//!
//! Each stage is a mono [`Stage`](prism_core::Stage): a stateful stream
//! transform plus a plain-data parameter snapshot.
//!
//! - [`Phaser`] - LFO-swept allpass cascade with feedback
//! - [`Chorus`] - Modulated delay with feedback
//! - [`Overdrive`] - Saturating ladder kernel held fully open
//! - [`LadderFilter`] - Resonant transistor ladder, six response modes
//! - [`ParametricFilter`] - Biquad with peak/bandpass/notch/allpass modes
//!   and a coefficient cache
//!
//! ## Example
//!
//! ```rust
//! use prism_core::{Effect, Stage};
//! use prism_effects::{FilterMode, FilterSettings, ParametricFilter};
//!
//! let mut filter = ParametricFilter::new(48000.0);
//! filter.apply(&FilterSettings {
//!     mode: FilterMode::Notch,
//!     frequency: 60.0,
//!     quality: 4.0,
//!     gain_db: 0.0,
//! });
//!
//! let mut block = [0.5_f32; 64];
//! filter.process_block_inplace(&mut block);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod ladder_filter;
pub mod overdrive;
pub mod parametric_filter;
pub mod phaser;

// Re-export main types at crate root
pub use chorus::{Chorus, ChorusParams};
pub use ladder_filter::{LadderFilter, LadderParams};
pub use overdrive::{Overdrive, OverdriveParams};
pub use parametric_filter::{FilterMode, FilterSettings, ParametricFilter};
pub use phaser::{Phaser, PhaserParams};
