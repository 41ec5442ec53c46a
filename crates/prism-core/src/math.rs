//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`soft_clip`] - tanh saturation
//! - [`wet_dry_mix`] - Linear crossfade
//! - [`ms_to_samples`] - Time conversion
//! - [`flush_denormal`] - Subnormal guard for feedback paths

use libm::{expf, logf, tanhf};

/// Floor returned by [`linear_to_db`] for silent or non-positive input.
pub const SILENCE_DB: f32 = -100.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use prism_core::db_to_linear;
///
/// assert_eq!(db_to_linear(0.0), 1.0);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels, floored at [`SILENCE_DB`].
///
/// # Example
/// ```rust
/// use prism_core::{linear_to_db, SILENCE_DB};
///
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), SILENCE_DB);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    if linear <= 0.0 || linear.is_nan() {
        return SILENCE_DB;
    }
    (logf(linear) * FACTOR).max(SILENCE_DB)
}

/// Soft clip using hyperbolic tangent.
///
/// Smooth saturation that approaches ±1 asymptotically.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Convert milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * 0.001 * sample_rate
}

/// Replace values below 1e-20 with zero.
///
/// Use in feedback loops where signal can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for db in [-24.0, -6.0, 0.0, 6.0, 12.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-3);
        }
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert_eq!(linear_to_db(0.0), SILENCE_DB);
        assert_eq!(linear_to_db(-1.0), SILENCE_DB);
        assert_eq!(linear_to_db(1e-12), SILENCE_DB);
    }

    #[test]
    fn test_wet_dry_mix_endpoints() {
        assert_eq!(wet_dry_mix(0.2, 0.8, 0.0), 0.2);
        assert_eq!(wet_dry_mix(0.2, 0.8, 1.0), 0.8);
    }

    #[test]
    fn test_ms_to_samples() {
        assert!((ms_to_samples(7.0, 48000.0) - 336.0).abs() < 1e-3);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
