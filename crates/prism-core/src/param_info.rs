//! Static parameter descriptions.
//!
//! Every user-facing control is described once by a [`ParamDescriptor`]: a
//! stable string id (the persistence key), a display name, a unit, a
//! [`ParamKind`] and, for continuous controls, a range with a step grid and
//! a skew factor for knob travel.
//!
//! Descriptors are `const`-constructible so a whole layout can live in a
//! `static` table.
//!
//! # Normalization
//!
//! Skew maps a plain value to knob position `norm = ((v - min)/(max - min))^skew`.
//! A skew below 1.0 gives more travel to the low end of the range, which suits
//! frequency controls spanning 20 Hz to 20 kHz.
//!
//! # Example
//!
//! ```rust
//! use prism_core::{ParamDescriptor, ParamUnit};
//!
//! const CUTOFF: ParamDescriptor =
//!     ParamDescriptor::float("cutoff", "Cutoff", ParamUnit::Hertz, 20.0, 20000.0, 1000.0)
//!         .with_step(1.0)
//!         .with_skew(0.23);
//!
//! assert_eq!(CUTOFF.sanitize(50000.0), 20000.0);
//! assert_eq!(CUTOFF.sanitize(440.4), 440.0);
//! let knob = CUTOFF.normalize(1000.0);
//! assert!((CUTOFF.denormalize(knob) - 1000.0).abs() < 0.5);
//! ```

use libm::{powf, roundf};

/// What kind of value a parameter holds.
///
/// All kinds are stored as `f32`: choices as their index, toggles as
/// `0.0`/`1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Continuous value within a range
    Float,
    /// One of a fixed list of labels, stored as the index
    Choice(&'static [&'static str]),
    /// On/off toggle
    Bool,
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB)
    Decibels,
    /// Hertz (Hz)
    Hertz,
    /// Milliseconds (ms)
    Milliseconds,
    /// Normalized amount shown as a percentage
    Percent,
    /// Multiplier (drive amounts)
    Multiplier,
    /// Dimensionless
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use prism_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Multiplier => "x",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier, used as the persistence key. Never rename.
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Display unit
    pub unit: ParamUnit,
    /// Value kind
    pub kind: ParamKind,
    /// Minimum plain value
    pub min: f32,
    /// Maximum plain value
    pub max: f32,
    /// Default plain value
    pub default: f32,
    /// Step grid size, `0.0` for continuous
    pub step: f32,
    /// Knob travel skew, `1.0` for linear
    pub skew: f32,
}

impl ParamDescriptor {
    /// Continuous parameter with the default step (0.01) and linear skew.
    pub const fn float(id: &'static str, name: &'static str, unit: ParamUnit, min: f32, max: f32, default: f32) -> Self {
        Self {
            id,
            name,
            unit,
            kind: ParamKind::Float,
            min,
            max,
            default,
            step: 0.01,
            skew: 1.0,
        }
    }

    /// Choice parameter over `labels`, stored as the selected index.
    pub const fn choice(id: &'static str, name: &'static str, labels: &'static [&'static str], default_index: usize) -> Self {
        let last = if labels.is_empty() { 0 } else { labels.len() - 1 };
        Self {
            id,
            name,
            unit: ParamUnit::None,
            kind: ParamKind::Choice(labels),
            min: 0.0,
            max: last as f32,
            default: default_index as f32,
            step: 1.0,
            skew: 1.0,
        }
    }

    /// On/off parameter.
    pub const fn toggle(id: &'static str, name: &'static str, default: bool) -> Self {
        Self {
            id,
            name,
            unit: ParamUnit::None,
            kind: ParamKind::Bool,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            step: 1.0,
            skew: 1.0,
        }
    }

    /// Override the step grid.
    #[must_use]
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Override the skew factor.
    #[must_use]
    pub const fn with_skew(mut self, skew: f32) -> Self {
        self.skew = skew;
        self
    }

    /// True for continuous parameters.
    pub const fn is_float(&self) -> bool {
        matches!(self.kind, ParamKind::Float)
    }

    /// Choice labels, empty for non-choice parameters.
    pub const fn labels(&self) -> &'static [&'static str] {
        match self.kind {
            ParamKind::Choice(labels) => labels,
            _ => &[],
        }
    }

    /// Clamp to `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Round to the nearest step from `min`, then clamp.
    pub fn snap(&self, value: f32) -> f32 {
        if self.step <= 0.0 {
            return self.clamp(value);
        }
        self.clamp(self.min + self.step * roundf((value - self.min) / self.step))
    }

    /// Make an arbitrary input legal for this parameter.
    ///
    /// Non-finite input falls back to the default. Choices round to an index,
    /// toggles threshold at one half.
    pub fn sanitize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        match self.kind {
            ParamKind::Float => self.snap(value),
            ParamKind::Choice(_) => self.clamp(roundf(value)),
            ParamKind::Bool => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Plain value to knob position in `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let proportion = ((self.clamp(value) - self.min) / range).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            powf(proportion, self.skew)
        }
    }

    /// Knob position in `[0, 1]` to plain value. Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let proportion = if self.skew == 1.0 || self.skew <= 0.0 {
            normalized
        } else {
            powf(normalized, 1.0 / self.skew)
        };
        self.min + proportion * (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: &[&str] = &["Peak", "Bandpass", "Notch", "Allpass"];

    #[test]
    fn test_choice_range_follows_labels() {
        let mode = ParamDescriptor::choice("mode", "Mode", MODES, 0);
        assert_eq!(mode.min, 0.0);
        assert_eq!(mode.max, 3.0);
        assert_eq!(mode.labels().len(), 4);
        assert_eq!(mode.sanitize(2.4), 2.0);
        assert_eq!(mode.sanitize(9.0), 3.0);
    }

    #[test]
    fn test_toggle_sanitizes_to_zero_or_one() {
        let bypass = ParamDescriptor::toggle("bypass", "Bypass", false);
        assert_eq!(bypass.default, 0.0);
        assert_eq!(bypass.sanitize(0.7), 1.0);
        assert_eq!(bypass.sanitize(0.2), 0.0);
        assert!(bypass.labels().is_empty());
    }

    #[test]
    fn test_snap_uses_step_grid() {
        let q = ParamDescriptor::float("q", "Q", ParamUnit::None, 0.1, 10.0, 1.0).with_step(0.05);
        assert!((q.snap(1.02) - 1.0).abs() < 1e-5);
        assert!((q.snap(1.04) - 1.05).abs() < 1e-5);
        assert_eq!(q.snap(-3.0), 0.1);
    }

    #[test]
    fn test_non_finite_falls_back_to_default() {
        let gain = ParamDescriptor::float("gain", "Gain", ParamUnit::Decibels, -12.0, 12.0, 0.0);
        assert_eq!(gain.sanitize(f32::NAN), 0.0);
        assert_eq!(gain.sanitize(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_skew_gives_low_end_more_travel() {
        let freq = ParamDescriptor::float("f", "Freq", ParamUnit::Hertz, 20.0, 20000.0, 1000.0).with_skew(0.23);
        // 1 kHz sits well past the linear 5% mark on the knob
        assert!(freq.normalize(1000.0) > 0.4);
        for norm in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let plain = freq.denormalize(norm);
            assert!((freq.normalize(plain) - norm).abs() < 1e-4);
        }
    }

    #[test]
    fn test_linear_normalization() {
        let mix = ParamDescriptor::float("mix", "Mix", ParamUnit::Percent, 0.0, 1.0, 0.5);
        assert_eq!(mix.normalize(0.25), 0.25);
        assert_eq!(mix.denormalize(0.75), 0.75);
        assert!(mix.is_float());
    }
}
