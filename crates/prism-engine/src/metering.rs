//! Level Metering Channels.
//!
//! The audio thread pushes one [`LevelSnapshot`] per block; the control
//! thread polls at its own cadence and keeps only the newest snapshot. When
//! the control side falls behind, the fifo fills and new snapshots are
//! dropped until it catches up. A meter only ever displays the latest
//! reading, so the loss is invisible; the drop count is kept for diagnostics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use prism_core::linear_to_db;

use crate::fifo::{FifoConsumer, FifoProducer, fifo};

/// Root-mean-square of a block. Zero for an empty block.
#[inline]
pub fn rms(block: &[f32]) -> f32 {
    if block.is_empty() {
        return 0.0;
    }
    let sum: f32 = block.iter().map(|s| s * s).sum();
    (sum / block.len() as f32).sqrt()
}

/// Per-block RMS of both channels, linear scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelSnapshot {
    /// Left channel RMS
    pub left: f32,
    /// Right channel RMS
    pub right: f32,
}

impl LevelSnapshot {
    /// Measure a stereo block.
    #[inline]
    pub fn measure(left: &[f32], right: &[f32]) -> Self {
        Self {
            left: rms(left),
            right: rms(right),
        }
    }

    /// Both channels in decibels, floored at -100 dB.
    pub fn to_db(self) -> (f32, f32) {
        (linear_to_db(self.left), linear_to_db(self.right))
    }

    /// Louder of the two channels.
    pub fn peak(self) -> f32 {
        self.left.max(self.right)
    }
}

/// Create a Level Channel.
pub fn level_channel(capacity: usize) -> (LevelSender, LevelReceiver) {
    let (producer, consumer) = fifo(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        LevelSender {
            producer,
            dropped: Arc::clone(&dropped),
        },
        LevelReceiver { consumer, dropped },
    )
}

/// Audio-thread half of a Level Channel.
#[derive(Debug)]
pub struct LevelSender {
    producer: FifoProducer<LevelSnapshot>,
    dropped: Arc<AtomicU64>,
}

impl LevelSender {
    /// Queue a snapshot, dropping it if the channel is full.
    #[inline]
    pub fn push(&mut self, snapshot: LevelSnapshot) -> bool {
        let sent = self.producer.push(snapshot);
        if !sent {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }
}

/// Control-thread half of a Level Channel.
#[derive(Debug)]
pub struct LevelReceiver {
    consumer: FifoConsumer<LevelSnapshot>,
    dropped: Arc<AtomicU64>,
}

impl LevelReceiver {
    /// Drain the channel and return the newest snapshot, if any.
    pub fn latest(&mut self) -> Option<LevelSnapshot> {
        self.consumer.pull_latest()
    }

    /// Snapshots dropped on a full channel since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
