//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a second-order IIR filter plus closed-form coefficient
//! formulas for the peaking, band-pass, notch and all-pass responses.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.
//! Every formula returns a normalized [`BiquadCoefficients`] value so callers
//! can cache and compare coefficient sets without touching filter state.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf};

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n]
    pub b0: f32,
    /// Feedforward coefficient for x[n-1]
    pub b1: f32,
    /// Feedforward coefficient for x[n-2]
    pub b2: f32,
    /// Feedback coefficient for y[n-1]
    pub a1: f32,
    /// Feedback coefficient for y[n-2]
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Build from raw cookbook terms, normalizing by `a0`.
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Biquad {
    coefficients: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self::with_coefficients(BiquadCoefficients::IDENTITY)
    }

    /// Creates a biquad with the given coefficients and cleared history.
    pub fn with_coefficients(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replace the coefficients. Filter history is kept so parameter sweeps
    /// stay continuous.
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter state (delay lines).
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cookbook intermediates: `(cos(w0), alpha)`.
#[inline]
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    (cosf(omega), sinf(omega) / (2.0 * q))
}

/// Peaking EQ coefficients.
///
/// Boosts or cuts around `frequency` with bandwidth set by `q`. At 0 dB the
/// numerator equals the denominator and the filter is an exact passthrough.
pub fn peaking_eq_coefficients(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> BiquadCoefficients {
    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    BiquadCoefficients::from_raw(
        1.0 + alpha * a,
        -2.0 * cos_omega,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_omega,
        1.0 - alpha / a,
    )
}

/// Band-pass coefficients with constant 0 dB peak gain.
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    BiquadCoefficients::from_raw(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// Notch (band-reject) coefficients.
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    BiquadCoefficients::from_raw(
        1.0,
        -2.0 * cos_omega,
        1.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order all-pass coefficients.
///
/// Unity magnitude at every frequency; phase rotates through 360 degrees with
/// the steepest change at `frequency`.
pub fn allpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    BiquadCoefficients::from_raw(
        1.0 - alpha,
        -2.0 * cos_omega,
        1.0 + alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn sine_gain(coefficients: BiquadCoefficients, freq: f32) -> f32 {
        let mut filter = Biquad::with_coefficients(coefficients);
        let mut peak = 0.0_f32;
        for n in 0..9600 {
            let x = sinf(2.0 * PI * freq * n as f32 / SR);
            let y = filter.process(x);
            if n > 4800 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn test_identity_passthrough() {
        let mut filter = Biquad::new();
        for &x in &[1.0, -0.5, 0.25, 0.0] {
            assert_eq!(filter.process(x), x);
        }
    }

    #[test]
    fn test_normalization() {
        let c = BiquadCoefficients::from_raw(2.0, 4.0, 6.0, 2.0, 1.0, 0.5);
        assert_eq!(c.b0, 1.0);
        assert_eq!(c.b1, 2.0);
        assert_eq!(c.b2, 3.0);
        assert_eq!(c.a1, 0.5);
        assert_eq!(c.a2, 0.25);
    }

    #[test]
    fn test_peaking_zero_db_is_transparent() {
        let mut filter = Biquad::with_coefficients(peaking_eq_coefficients(1000.0, 5.0, 0.0, SR));
        assert!((filter.process(1.0) - 1.0).abs() < 1e-6);
        for _ in 0..64 {
            assert!(filter.process(0.0).abs() < 1e-7);
        }
    }

    #[test]
    fn test_peaking_boost_at_center() {
        let gain = sine_gain(peaking_eq_coefficients(1000.0, 1.0, 12.0, SR), 1000.0);
        let expected = powf(10.0, 12.0 / 20.0);
        assert!((gain - expected).abs() / expected < 0.05, "gain {gain}");
    }

    #[test]
    fn test_bandpass_rejects_far_frequencies() {
        let c = bandpass_coefficients(1000.0, 2.0, SR);
        assert!(sine_gain(c, 1000.0) > 0.9);
        assert!(sine_gain(c, 50.0) < 0.1);
    }

    #[test]
    fn test_notch_kills_center() {
        let c = notch_coefficients(1000.0, 2.0, SR);
        assert!(sine_gain(c, 1000.0) < 0.05);
        assert!(sine_gain(c, 100.0) > 0.9);
    }

    #[test]
    fn test_allpass_unity_magnitude() {
        let c = allpass_coefficients(1000.0, 0.7, SR);
        for freq in [100.0, 1000.0, 8000.0] {
            let gain = sine_gain(c, freq);
            assert!((gain - 1.0).abs() < 0.02, "{freq} Hz gain {gain}");
        }
    }

    #[test]
    fn test_clear_keeps_coefficients() {
        let c = notch_coefficients(440.0, 1.0, SR);
        let mut filter = Biquad::with_coefficients(c);
        filter.process(1.0);
        filter.clear();
        assert_eq!(*filter.coefficients(), c);
        assert_eq!(filter, Biquad::with_coefficients(c));
    }
}
