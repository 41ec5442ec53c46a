//! Four-stage transistor ladder filter kernel.
//!
//! Five-state ladder with a tanh-saturated input and feedback path. The
//! response type is selected by mixing the stage outputs, so one kernel
//! yields 12 and 24 dB/oct low-pass, high-pass and band-pass shapes.
//!
//! ```text
//!            ┌────────────── -4·k·(sat(e) - comp·x) ───────────┐
//!            v                                                  │
//! x ─ sat ─ (+) ─ a ─ [1-pole] ─ b ─ [1-pole] ─ c ─ [1-pole] ─ d ─ [1-pole] ─ e
//!                 └──────── out = Σ mix[i] · stage[i] ──────────┘
//! ```
//!
//! The drive control scales the input into the saturator and applies a
//! loudness-matching makeup gain, so raising drive adds harmonics without a
//! large level jump. The same kernel doubles as the overdrive stage when
//! configured fully open (LPF12, 20 kHz, zero resonance).

use core::f32::consts::PI;
use libm::{expf, powf, tanhf};

/// Ladder response type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LadderMode {
    /// 12 dB/oct low-pass
    #[default]
    Lpf12,
    /// 12 dB/oct high-pass
    Hpf12,
    /// 12 dB/oct band-pass
    Bpf12,
    /// 24 dB/oct low-pass
    Lpf24,
    /// 24 dB/oct high-pass
    Hpf24,
    /// 24 dB/oct band-pass
    Bpf24,
}

impl LadderMode {
    /// All modes in choice-index order.
    pub const ALL: [Self; 6] = [
        Self::Lpf12,
        Self::Hpf12,
        Self::Bpf12,
        Self::Lpf24,
        Self::Hpf24,
        Self::Bpf24,
    ];

    /// Display labels in choice-index order.
    pub const LABELS: [&'static str; 6] = ["LPF12", "HPF12", "BPF12", "LPF24", "HPF24", "BPF24"];

    /// Mode for a choice index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Choice index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stage mix weights and feedback input compensation.
    fn mix(self) -> ([f32; 5], f32) {
        match self {
            Self::Lpf12 => ([0.0, 0.0, 1.0, 0.0, 0.0], 0.5),
            Self::Hpf12 => ([1.0, -2.0, 1.0, 0.0, 0.0], 0.0),
            Self::Bpf12 => ([0.0, 0.0, -1.0, 1.0, 0.0], 0.5),
            Self::Lpf24 => ([0.0, 0.0, 0.0, 0.0, 1.0], 0.5),
            Self::Hpf24 => ([1.0, -4.0, 6.0, -4.0, 1.0], 0.0),
            Self::Bpf24 => ([0.0, 0.0, 1.0, -2.0, 1.0], 0.5),
        }
    }
}

/// Transistor ladder filter with drive.
///
/// # Example
///
/// ```rust
/// use prism_core::{Ladder, LadderMode};
///
/// let mut ladder = Ladder::new(48000.0);
/// ladder.set_mode(LadderMode::Lpf24);
/// ladder.set_cutoff(800.0);
/// ladder.set_resonance(0.3);
/// let y = ladder.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    state: [f32; 5],
    mix: [f32; 5],
    comp: f32,
    mode: LadderMode,

    cutoff_hz: f32,
    cutoff_transform: f32,
    resonance: f32,
    scaled_resonance: f32,

    drive: f32,
    gain: f32,
    drive2: f32,
    gain2: f32,

    sample_rate: f32,
}

impl Ladder {
    /// Create an open LPF12 ladder (20 kHz, no resonance, unity drive).
    pub fn new(sample_rate: f32) -> Self {
        let (mix, comp) = LadderMode::Lpf12.mix();
        let mut ladder = Self {
            state: [0.0; 5],
            mix,
            comp,
            mode: LadderMode::Lpf12,
            cutoff_hz: 20000.0,
            cutoff_transform: 0.0,
            resonance: 0.0,
            scaled_resonance: 0.0,
            drive: 1.0,
            gain: 1.0,
            drive2: 1.0,
            gain2: 1.0,
            sample_rate,
        };
        ladder.update_cutoff();
        ladder.set_resonance(0.0);
        ladder.set_drive(1.0);
        ladder
    }

    /// Set the response type.
    pub fn set_mode(&mut self, mode: LadderMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        let (mix, comp) = mode.mix();
        self.mix = mix;
        self.comp = comp;
    }

    /// Current response type.
    pub fn mode(&self) -> LadderMode {
        self.mode
    }

    /// Set cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz == self.cutoff_hz {
            return;
        }
        self.cutoff_hz = cutoff_hz.max(1.0);
        self.update_cutoff();
    }

    /// Cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    /// Set resonance in `[0, 1]`.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 1.0);
        self.scaled_resonance = 0.1 + self.resonance * 0.9;
    }

    /// Set drive, `>= 1`. Makeup gain follows a fitted loudness curve.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(1.0);
        self.gain = makeup_gain(self.drive);
        self.drive2 = self.drive * 0.04 + 0.96;
        self.gain2 = makeup_gain(self.drive2);
    }

    /// Current drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Set sample rate and recompute the cutoff mapping.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_cutoff();
    }

    /// Clear filter state.
    pub fn reset(&mut self) {
        self.state = [0.0; 5];
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let s = &mut self.state;
        let a1 = self.cutoff_transform;
        let g = 1.0 - a1;
        let b0 = g * 0.769_230_77;
        let b1 = g * 0.230_769_23;

        let dx = self.gain * tanhf(self.drive * input);
        let a = dx + self.scaled_resonance * -4.0 * (self.gain2 * tanhf(self.drive2 * s[4]) - dx * self.comp);
        let b = b1 * s[0] + a1 * s[1] + b0 * a;
        let c = b1 * s[1] + a1 * s[2] + b0 * b;
        let d = b1 * s[2] + a1 * s[3] + b0 * c;
        let e = b1 * s[3] + a1 * s[4] + b0 * d;

        *s = [a, b, c, d, e];

        let m = &self.mix;
        a * m[0] + b * m[1] + c * m[2] + d * m[3] + e * m[4]
    }

    fn update_cutoff(&mut self) {
        self.cutoff_transform = expf(self.cutoff_hz * (-2.0 * PI / self.sample_rate));
    }
}

impl Default for Ladder {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[inline]
fn makeup_gain(drive: f32) -> f32 {
    powf(drive, -2.642) * 0.6103 + 0.3903
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::sinf;

    const SR: f32 = 48000.0;

    fn steady_peak(ladder: &mut Ladder, freq: f32, amplitude: f32) -> f32 {
        ladder.reset();
        let mut peak = 0.0_f32;
        for n in 0..9600 {
            let y = ladder.process(amplitude * sinf(2.0 * PI * freq * n as f32 / SR));
            if n > 4800 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn test_lowpass_attenuates_highs() {
        let mut ladder = Ladder::new(SR);
        ladder.set_mode(LadderMode::Lpf24);
        ladder.set_cutoff(500.0);
        let low = steady_peak(&mut ladder, 100.0, 0.1);
        let high = steady_peak(&mut ladder, 8000.0, 0.1);
        assert!(high < low * 0.05, "low {low} high {high}");
    }

    #[test]
    fn test_highpass_attenuates_lows() {
        let mut ladder = Ladder::new(SR);
        ladder.set_mode(LadderMode::Hpf12);
        ladder.set_cutoff(4000.0);
        let low = steady_peak(&mut ladder, 60.0, 0.1);
        let high = steady_peak(&mut ladder, 12000.0, 0.1);
        assert!(low < high * 0.1, "low {low} high {high}");
    }

    #[test]
    fn test_drive_saturates_but_stays_bounded() {
        let mut ladder = Ladder::new(SR);
        ladder.set_drive(100.0);
        let peak = steady_peak(&mut ladder, 220.0, 1.0);
        assert!(peak.is_finite());
        assert!(peak < 2.0, "peak {peak}");
    }

    #[test]
    fn test_mode_index_roundtrip() {
        for (i, mode) in LadderMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
            assert_eq!(LadderMode::from_index(i), Some(*mode));
        }
        assert_eq!(LadderMode::from_index(6), None);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ladder = Ladder::new(SR);
        ladder.process(1.0);
        ladder.reset();
        assert_eq!(ladder, Ladder::new(SR));
    }
}
