//! Fractional delay line for modulated time-based effects.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolated delay line using a circular buffer (heap-allocated).
///
/// Supports fractional delay times through linear interpolation, allowing
/// smooth modulation of delay time without zipper noise.
///
/// The buffer is allocated on construction or [`resize`](Self::resize) and
/// never during processing.
///
/// # Example
///
/// ```rust
/// use prism_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(64);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedDelay {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Creates a new delay line holding at least one sample.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1)],
            write_pos: 0,
        }
    }

    /// Creates a delay line from sample rate and max delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Reallocate for a new capacity and clear. Not real-time safe.
    pub fn resize(&mut self, max_delay_samples: usize) {
        self.buffer = vec![0.0; max_delay_samples.max(1)];
        self.write_pos = 0;
        #[cfg(feature = "tracing")]
        tracing::debug!("delay_resize: {} samples", self.buffer.len());
    }

    /// Reads a delayed sample with linear interpolation.
    ///
    /// A delay of `0.0` returns the most recently written sample. Delays past
    /// the capacity are clamped.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay_clamped = delay_samples.clamp(0.0, (len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let next_pos = (read_pos + len - 1) % len;
        let a = self.buffer[read_pos];
        let b = self.buffer[next_pos];
        a + (b - a) * frac
    }

    /// Writes a sample to the delay line and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Clears the delay line (sets all samples to 0).
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Returns the maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_delay() {
        let mut delay = InterpolatedDelay::new(16);
        delay.write(1.0);
        for _ in 0..4 {
            delay.write(0.0);
        }
        assert_eq!(delay.read(4.0), 1.0);
        assert_eq!(delay.read(3.0), 0.0);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let mut delay = InterpolatedDelay::new(16);
        delay.write(1.0);
        delay.write(0.0);
        assert!((delay.read(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear_and_capacity() {
        let mut delay = InterpolatedDelay::from_time(1000.0, 0.1);
        assert_eq!(delay.capacity(), 101);
        delay.write(1.0);
        delay.clear();
        assert_eq!(delay.read(0.0), 0.0);
        delay.resize(8);
        assert_eq!(delay.capacity(), 8);
    }
}
