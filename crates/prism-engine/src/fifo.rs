//! Bounded single-producer/single-consumer fifo.
//!
//! Thin wrapper over [`rtrb`] that fixes the overflow policy used by every
//! cross-thread channel in the engine: a push into a full fifo fails and the
//! *new* value is dropped, leaving the queued values untouched. Neither side
//! ever blocks or allocates after construction.
//!
//! ```rust
//! use prism_engine::fifo;
//!
//! let (mut tx, mut rx) = fifo::<u32>(2);
//! assert!(tx.push(1));
//! assert!(tx.push(2));
//! assert!(!tx.push(3)); // full: 3 is dropped
//! assert_eq!(rx.pull(), Some(1));
//! assert_eq!(rx.pull(), Some(2));
//! assert_eq!(rx.pull(), None);
//! ```

/// Capacity used by the order and level channels.
pub const DEFAULT_CAPACITY: usize = 8;

/// Create a fifo holding up to `capacity` values (at least one).
pub fn fifo<T>(capacity: usize) -> (FifoProducer<T>, FifoConsumer<T>) {
    let (producer, consumer) = rtrb::RingBuffer::new(capacity.max(1));
    (FifoProducer { inner: producer }, FifoConsumer { inner: consumer })
}

/// Writing half. Owned by exactly one thread.
#[derive(Debug)]
pub struct FifoProducer<T> {
    inner: rtrb::Producer<T>,
}

impl<T> FifoProducer<T> {
    /// Enqueue `value`. Returns `false` and drops `value` if the fifo is full.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.inner.push(value).is_ok()
    }

    /// Free slots right now.
    pub fn free_slots(&self) -> usize {
        self.inner.slots()
    }

    /// Total capacity.
    pub fn capacity(&self) -> usize {
        self.inner.buffer().capacity()
    }

    /// True once the consumer has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.inner.is_abandoned()
    }
}

/// Reading half. Owned by exactly one thread.
#[derive(Debug)]
pub struct FifoConsumer<T> {
    inner: rtrb::Consumer<T>,
}

impl<T> FifoConsumer<T> {
    /// Dequeue the oldest value, or `None` if empty.
    #[inline]
    pub fn pull(&mut self) -> Option<T> {
        self.inner.pop().ok()
    }

    /// Drain everything queued and return only the newest value.
    #[inline]
    pub fn pull_latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Some(value) = self.pull() {
            latest = Some(value);
        }
        latest
    }

    /// Values currently queued.
    pub fn len(&self) -> usize {
        self.inner.slots()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Total capacity.
    pub fn capacity(&self) -> usize {
        self.inner.buffer().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_drops_newest_and_keeps_first_n() {
        let (mut tx, mut rx) = fifo::<usize>(DEFAULT_CAPACITY);
        for i in 0..DEFAULT_CAPACITY {
            assert!(tx.push(i));
        }
        assert!(!tx.push(99));
        assert_eq!(tx.free_slots(), 0);

        let drained: Vec<usize> = std::iter::from_fn(|| rx.pull()).collect();
        assert_eq!(drained, (0..DEFAULT_CAPACITY).collect::<Vec<_>>());
    }

    #[test]
    fn pull_latest_coalesces() {
        let (mut tx, mut rx) = fifo::<u8>(4);
        tx.push(1);
        tx.push(2);
        tx.push(3);
        assert_eq!(rx.len(), 3);
        assert_eq!(rx.pull_latest(), Some(3));
        assert!(rx.is_empty());
        assert_eq!(rx.pull_latest(), None);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let (mut tx, rx) = fifo::<u8>(0);
        assert_eq!(tx.capacity(), 1);
        assert_eq!(rx.capacity(), 1);
        assert!(tx.push(7));
        assert!(!tx.push(8));
    }

    #[test]
    fn works_across_threads() {
        let (mut tx, mut rx) = fifo::<u32>(DEFAULT_CAPACITY);
        let writer = std::thread::spawn(move || {
            let mut sent = 0;
            while sent < 1000 {
                if tx.push(sent) {
                    sent += 1;
                }
            }
        });

        let mut expected = 0;
        while expected < 1000 {
            if let Some(v) = rx.pull() {
                assert_eq!(v, expected);
                expected += 1;
            }
        }
        writer.join().unwrap();
    }

    #[test]
    fn abandoned_when_consumer_dropped() {
        let (tx, rx) = fifo::<u8>(2);
        assert!(!tx.is_abandoned());
        drop(rx);
        assert!(tx.is_abandoned());
    }
}
