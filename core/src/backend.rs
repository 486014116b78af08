//! Numeric backends for the pulse shaping and modulation pipeline
//!
//! Both produce the same line signal. [`Float`] works in `f32`. [`Fixed`]
//! keeps baseband points in Q10, coefficients in Q12 and the carrier in Q15,
//! for targets without a fast FPU.

use num_complex::Complex;
use std::fmt::Debug;

use crate::carrier::Dds;
use crate::constellation::GridPoint;
use crate::pulse_shaper::{PULSESHAPER_FIXED, PULSESHAPER_FLOAT, PULSESHAPER_GAIN};
use crate::DBM0_MAX_POWER;

/// Fixed point scale of constellation points (Q10)
pub const CONSTELLATION_FIXED_SCALE: i16 = 1024;
/// Converts a floating point gain to the fixed point one (Q15 output over Q10 baseband)
pub const FIXED_GAIN_SCALE: f32 = 32768.0 / CONSTELLATION_FIXED_SCALE as f32;

/// Arithmetic used to shape, modulate and scale the baseband signal
pub trait Backend: Debug + Clone + Copy + Default + PartialEq + 'static {
    /// Complex baseband point as held in the pulse shaping buffer
    type Point: Copy + Default + PartialEq + Debug;
    /// Output scale factor
    type Gain: Copy + PartialEq + PartialOrd + Debug;

    const NAME: &'static str;

    fn point(grid: GridPoint) -> Self::Point;

    /// Gain giving a transmit level of `power_dbm0`
    fn gain(power_dbm0: f32) -> Self::Gain;

    /// Filter one span of bauds at `baud_phase`, mix with the next carrier sample and scale
    fn sample(span: &[Self::Point], baud_phase: usize, carrier: &mut Dds, gain: Self::Gain) -> i16;
}

/// Gain shared by both backends before any fixed point scaling.
///
/// The constellations are designed to keep the same average power at every bit
/// rate, so the gain does not depend on the rate.
pub fn linear_gain(power_dbm0: f32) -> f32 {
    0.223 * 10.0_f32.powf((power_dbm0 - DBM0_MAX_POWER) / 20.0) * 32768.0 / PULSESHAPER_GAIN
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float;

impl Backend for Float {
    type Point = Complex<f32>;
    type Gain = f32;

    const NAME: &'static str = "float";

    fn point((re, im): GridPoint) -> Complex<f32> {
        Complex::new(re as f32, im as f32)
    }

    fn gain(power_dbm0: f32) -> f32 {
        linear_gain(power_dbm0)
    }

    #[inline]
    fn sample(span: &[Complex<f32>], baud_phase: usize, carrier: &mut Dds, gain: f32) -> i16 {
        let x: Complex<f32> = PULSESHAPER_FLOAT[baud_phase]
            .iter()
            .zip(span)
            .map(|(&c, &p)| p * c)
            .sum();
        let z = carrier.next_f32();
        // No saturation: the constellation and gain design leave headroom
        ((x.re * z.re - x.im * z.im) * gain).round() as i16
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed;

impl Backend for Fixed {
    type Point = Complex<i16>;
    type Gain = i32;

    const NAME: &'static str = "fixed";

    fn point((re, im): GridPoint) -> Complex<i16> {
        Complex::new(
            re as i16 * CONSTELLATION_FIXED_SCALE,
            im as i16 * CONSTELLATION_FIXED_SCALE,
        )
    }

    fn gain(power_dbm0: f32) -> i32 {
        (linear_gain(power_dbm0) * FIXED_GAIN_SCALE).round() as i32
    }

    #[inline]
    fn sample(span: &[Complex<i16>], baud_phase: usize, carrier: &mut Dds, gain: i32) -> i16 {
        let mut x = Complex::new(0i32, 0i32);
        for (&c, p) in PULSESHAPER_FIXED[baud_phase].iter().zip(span) {
            x.re += c as i32 * p.re as i32;
            x.im += c as i32 * p.im as i32;
        }
        // Q22 -> Q10
        x.re >>= 12;
        x.im >>= 12;
        let z = carrier.next_q15();
        let mixed = (x.re * z.re - x.im * z.im) >> 15;
        // Saturate like the float path's cast
        ((mixed as i64 * gain as i64) >> 15).clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse_shaper::FILTER_STEPS;
    use crate::{CARRIER_NOMINAL_FREQ, DEFAULT_TX_POWER_DBM0};

    #[test]
    fn test_gain_increases_with_power() {
        let levels = [-43.0, -30.0, -20.0, -14.0, -9.5, -3.0, 0.0, DBM0_MAX_POWER];
        for pair in levels.windows(2) {
            assert!(Float::gain(pair[0]) < Float::gain(pair[1]), "{:?}", pair);
            assert!(Fixed::gain(pair[0]) < Fixed::gain(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_gain_reference_points() {
        // 20 dB down is a tenth of the amplitude
        let ratio = Float::gain(-20.0) / Float::gain(0.0);
        assert!((ratio - 0.1).abs() < 1e-5);

        let at_max = Float::gain(DBM0_MAX_POWER);
        assert!((at_max - 0.223 * 32768.0 / PULSESHAPER_GAIN).abs() < 0.01);
    }

    #[test]
    fn test_fixed_gain_scaling() {
        let float = Float::gain(DEFAULT_TX_POWER_DBM0);
        let fixed = Fixed::gain(DEFAULT_TX_POWER_DBM0);
        assert!((fixed as f32 - float * 32.0).abs() <= 0.5);
    }

    #[test]
    fn test_point_scaling() {
        assert_eq!(Float::point((-8, 3)), Complex::new(-8.0, 3.0));
        assert_eq!(Fixed::point((-8, 3)), Complex::new(-8192, 3072));
        assert_eq!(Fixed::point((9, -9)), Complex::new(9216, -9216));
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut dds = Dds::new(CARRIER_NOMINAL_FREQ);
        let float_span = [Complex::new(0.0f32, 0.0); FILTER_STEPS];
        let fixed_span = [Complex::new(0i16, 0); FILTER_STEPS];
        for phase in 0..10 {
            assert_eq!(Float::sample(&float_span, phase, &mut dds, 1000.0), 0);
            assert_eq!(Fixed::sample(&fixed_span, phase, &mut dds, 32000), 0);
        }
    }

    #[test]
    fn test_backends_agree() {
        let gain_f = Float::gain(DEFAULT_TX_POWER_DBM0);
        let gain_x = Fixed::gain(DEFAULT_TX_POWER_DBM0);
        let grid: [GridPoint; FILTER_STEPS] =
            [(-8, -3), (9, 2), (0, 0), (6, -6), (-2, 6), (1, 8), (-5, -1), (7, 7), (0, -6)];
        let float_span: Vec<Complex<f32>> = grid.iter().map(|&g| Float::point(g)).collect();
        let fixed_span: Vec<Complex<i16>> = grid.iter().map(|&g| Fixed::point(g)).collect();

        let mut dds_f = Dds::new(CARRIER_NOMINAL_FREQ);
        let mut dds_x = Dds::new(CARRIER_NOMINAL_FREQ);
        for n in 0..100 {
            let phase = (n * 3) % 10;
            let f = Float::sample(&float_span, phase, &mut dds_f, gain_f) as i32;
            let x = Fixed::sample(&fixed_span, phase, &mut dds_x, gain_x) as i32;
            assert!((f - x).abs() <= 8, "sample {}: float {} fixed {}", n, f, x);
        }
    }

    #[test]
    fn test_fixed_saturates_like_float() {
        // Far above the maximum transmit level, so both outputs clip
        let gain_f = Float::gain(DBM0_MAX_POWER) * 16.0;
        let gain_x = Fixed::gain(DBM0_MAX_POWER) * 16;
        let grid: [GridPoint; FILTER_STEPS] =
            [(9, 2), (-8, -3), (9, 2), (-8, -3), (9, 2), (-8, -3), (9, 2), (-8, -3), (9, 2)];
        let float_span: Vec<Complex<f32>> = grid.iter().map(|&g| Float::point(g)).collect();
        let fixed_span: Vec<Complex<i16>> = grid.iter().map(|&g| Fixed::point(g)).collect();

        // A few Q10 steps of rounding, at this gain
        let tolerance = 4 * gain_x / 32768 + 2;
        let mut dds_f = Dds::new(CARRIER_NOMINAL_FREQ);
        let mut dds_x = Dds::new(CARRIER_NOMINAL_FREQ);
        let mut clipped = 0;
        for n in 0..200 {
            let phase = (n * 3) % 10;
            let f = Float::sample(&float_span, phase, &mut dds_f, gain_f) as i32;
            let x = Fixed::sample(&fixed_span, phase, &mut dds_x, gain_x) as i32;
            assert!((f - x).abs() <= tolerance, "sample {}: float {} fixed {}", n, f, x);
            if x == i16::MAX as i32 || x == i16::MIN as i32 {
                clipped += 1;
            }
        }
        assert!(clipped > 0, "Expected some samples to clip");
    }
}
