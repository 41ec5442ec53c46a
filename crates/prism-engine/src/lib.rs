//! Real-time orchestration for the prism effect chain.
//!
//! This crate wires the DSP stages of `prism-effects` into a stereo
//! processor that can run on a host's audio thread while a control surface
//! edits it from another thread.
//!
//! # Architecture
//!
//! ```text
//! control thread                      audio thread
//! Controller ── set_param ──▶ ParamStore ◀── read ── Processor
//! Controller ── commit_order ──▶ order fifo ──▶ Processor
//! Controller ◀── poll_*_level ── level fifos ◀── Processor
//! ```
//!
//! | Concern | Type | Mechanism |
//! |---------|------|-----------|
//! | Parameter values | [`ParamStore`] | `AtomicU32` per parameter |
//! | Smoothing | [`SmootherBank`] | linear ramps, advanced per chunk |
//! | Chain order | [`order_channel`] | SPSC fifo, coalesced on drain |
//! | Metering | [`level_channel`] | SPSC fifo, coalesced on poll |
//!
//! Every cross-thread channel is a bounded [`fifo`] that drops new values
//! when full. The audio thread never blocks, allocates or logs.
//!
//! # Example
//!
//! ```rust
//! use prism_engine::{ChainOrder, EffectOption, EngineConfig, create};
//!
//! let (mut processor, mut controller) = create(EngineConfig::default()).unwrap();
//!
//! controller.set_param("filter_gain", 6.0).unwrap();
//! controller.set_bypass(EffectOption::Chorus, true);
//! controller.commit_order(ChainOrder::identity().moved(4, 0).unwrap());
//!
//! let mut left = vec![0.0_f32; 512];
//! let mut right = vec![0.0_f32; 512];
//! processor.process_block(&mut left, &mut right);
//! assert_eq!(processor.order(), controller.order());
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod fifo;
pub mod layout;
pub mod metering;
pub mod order;
pub mod params;
pub mod pipeline;
pub mod processor;
pub mod smoother;
pub mod state;

pub use config::EngineConfig;
pub use controller::{Controller, create};
pub use error::{ConfigError, EngineError, OrderError, ParamError, Result, StateError};
pub use fifo::{FifoConsumer, FifoProducer, fifo};
pub use layout::{PARAMETERS, ParamIds};
pub use metering::{LevelReceiver, LevelSender, LevelSnapshot, level_channel, rms};
pub use order::{ChainOrder, EffectOption, OrderReceiver, OrderSender, order_channel};
pub use params::{ParamIndex, ParamStore};
pub use pipeline::{BypassFlags, ChainParams, ChannelPipeline};
pub use processor::Processor;
pub use smoother::SmootherBank;
pub use state::{PersistedState, STATE_VERSION};

pub use prism_core::{ParamDescriptor, ParamKind, ParamUnit};
