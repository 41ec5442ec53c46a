//! Effect options, chain orders, and the Order Channel.
//!
//! A [`ChainOrder`] is always a permutation of the five [`EffectOption`]s;
//! every constructor validates. Orders cross from the control thread to the
//! audio thread whole, through a bounded fifo, so the audio thread never sees
//! a half-edited chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::fifo::{FifoConsumer, FifoProducer, fifo};

/// One of the five effect stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectOption {
    /// Six-stage phaser
    Phaser,
    /// Modulated-delay chorus
    Chorus,
    /// Ladder saturator with the filter held open
    Overdrive,
    /// Transistor ladder filter
    LadderFilter,
    /// Mode-switchable biquad
    ParametricFilter,
}

impl EffectOption {
    /// Every option, in index order. Also the identity chain order.
    pub const ALL: [Self; 5] = [
        Self::Phaser,
        Self::Chorus,
        Self::Overdrive,
        Self::LadderFilter,
        Self::ParametricFilter,
    ];

    /// Number of options, and of slots in a chain order.
    pub const COUNT: usize = Self::ALL.len();

    /// Persisted integer code.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Option for a persisted integer code.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Phaser => "Phaser",
            Self::Chorus => "Chorus",
            Self::Overdrive => "Drive",
            Self::LadderFilter => "Ladder Filter",
            Self::ParametricFilter => "Filter",
        }
    }

    /// Short identifier used on the command line and in parameter ids.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Phaser => "phaser",
            Self::Chorus => "chorus",
            Self::Overdrive => "overdrive",
            Self::LadderFilter => "ladder",
            Self::ParametricFilter => "filter",
        }
    }
}

impl fmt::Display for EffectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectOption {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.name().eq_ignore_ascii_case(wanted) || option.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OrderError::UnknownOption(wanted.to_owned()))
    }
}

/// Processing sequence of the five stages.
///
/// ```rust
/// use prism_engine::{ChainOrder, EffectOption};
///
/// let order = ChainOrder::identity().moved(4, 0).unwrap();
/// assert_eq!(order.as_slice()[0], EffectOption::ParametricFilter);
/// assert_eq!(order.position_of(EffectOption::Phaser), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainOrder([EffectOption; EffectOption::COUNT]);

impl ChainOrder {
    /// Phaser, Chorus, Overdrive, LadderFilter, ParametricFilter.
    pub const fn identity() -> Self {
        Self(EffectOption::ALL)
    }

    /// Order from options, rejecting anything that is not a permutation.
    pub fn try_from_slice(options: &[EffectOption]) -> Result<Self, OrderError> {
        if options.len() != EffectOption::COUNT {
            return Err(OrderError::WrongLength {
                expected: EffectOption::COUNT,
                found: options.len(),
            });
        }
        let mut seen = [false; EffectOption::COUNT];
        let mut slots = EffectOption::ALL;
        for (slot, &option) in slots.iter_mut().zip(options) {
            if std::mem::replace(&mut seen[option.index()], true) {
                return Err(OrderError::Duplicate(option));
            }
            *slot = option;
        }
        Ok(Self(slots))
    }

    /// Order from persisted integer codes.
    pub fn try_from_indices(indices: &[u32]) -> Result<Self, OrderError> {
        if indices.len() != EffectOption::COUNT {
            return Err(OrderError::WrongLength {
                expected: EffectOption::COUNT,
                found: indices.len(),
            });
        }
        let mut options = EffectOption::ALL;
        for (slot, &code) in options.iter_mut().zip(indices) {
            *slot = usize::try_from(code)
                .ok()
                .and_then(EffectOption::from_index)
                .ok_or_else(|| OrderError::UnknownOption(code.to_string()))?;
        }
        Self::try_from_slice(&options)
    }

    /// Persisted integer codes.
    pub fn to_indices(&self) -> Vec<u32> {
        self.0.iter().map(|option| option.index() as u32).collect()
    }

    /// Slots in processing order.
    pub fn as_slice(&self) -> &[EffectOption] {
        &self.0
    }

    /// Iterate slots in processing order.
    pub fn iter(&self) -> impl Iterator<Item = EffectOption> + '_ {
        self.0.iter().copied()
    }

    /// Slot holding `option`.
    pub fn position_of(&self, option: EffectOption) -> usize {
        self.0.iter().position(|&o| o == option).unwrap_or(option.index())
    }

    /// Order with the option at slot `from` removed and reinserted at `to`.
    pub fn moved(&self, from: usize, to: usize) -> Result<Self, OrderError> {
        for slot in [from, to] {
            if slot >= EffectOption::COUNT {
                return Err(OrderError::SlotOutOfRange(slot));
            }
        }
        let mut slots = self.0;
        if from < to {
            slots[from..=to].rotate_left(1);
        } else {
            slots[to..=from].rotate_right(1);
        }
        Ok(Self(slots))
    }
}

impl Default for ChainOrder {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for ChainOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(option.name())?;
        }
        Ok(())
    }
}

impl FromStr for ChainOrder {
    type Err = OrderError;

    /// Comma-separated option names, e.g. `filter,phaser,chorus,overdrive,ladder`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let options = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<EffectOption>, _>>()?;
        Self::try_from_slice(&options)
    }
}

/// Create the Order Channel.
pub fn order_channel(capacity: usize) -> (OrderSender, OrderReceiver) {
    let (producer, consumer) = fifo(capacity);
    (OrderSender { producer }, OrderReceiver { consumer })
}

/// Control-thread half of the Order Channel.
#[derive(Debug)]
pub struct OrderSender {
    producer: FifoProducer<ChainOrder>,
}

impl OrderSender {
    /// Queue a whole order. Returns `false` if the channel is full and the
    /// order was dropped.
    pub fn push(&mut self, order: ChainOrder) -> bool {
        self.producer.push(order)
    }
}

/// Audio-thread half of the Order Channel.
#[derive(Debug)]
pub struct OrderReceiver {
    consumer: FifoConsumer<ChainOrder>,
}

impl OrderReceiver {
    /// Pull until empty and return the newest order, if any arrived.
    #[inline]
    pub fn drain(&mut self) -> Option<ChainOrder> {
        self.consumer.pull_latest()
    }
}
