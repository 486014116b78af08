//! Direct digital synthesis of the carrier
//!
//! A 32-bit phase accumulator: one full turn is 2^32, so phase wrap-around is
//! free and the phase never drifts out of range.

use num_complex::Complex;
use std::f64::consts::TAU;

use crate::SAMPLE_RATE;

const PHASE_TURN: f64 = 65536.0 * 65536.0;

/// Per-sample phase increment for a frequency in Hz
pub fn phase_rate(freq_hz: f32) -> u32 {
    (freq_hz as f64 * PHASE_TURN / SAMPLE_RATE as f64) as u32
}

/// Carrier oscillator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dds {
    phase: u32,
    rate: u32,
}

impl Dds {
    pub fn new(freq_hz: f32) -> Self {
        Self {
            phase: 0,
            rate: phase_rate(freq_hz),
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0;
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    fn angle(&self) -> f64 {
        self.phase as f64 * TAU / PHASE_TURN
    }

    /// (cos, sin) at the current phase, then advance one sample
    #[inline]
    pub fn next_f32(&mut self) -> Complex<f32> {
        let (sin, cos) = self.angle().sin_cos();
        self.phase = self.phase.wrapping_add(self.rate);
        Complex::new(cos as f32, sin as f32)
    }

    /// As [`Dds::next_f32`], in Q15
    #[inline]
    pub fn next_q15(&mut self) -> Complex<i32> {
        let (sin, cos) = self.angle().sin_cos();
        self.phase = self.phase.wrapping_add(self.rate);
        Complex::new((cos * 32767.0).round() as i32, (sin * 32767.0).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CARRIER_NOMINAL_FREQ;

    #[test]
    fn test_carrier_phase_rate() {
        assert_eq!(phase_rate(CARRIER_NOMINAL_FREQ), 966_367_641);
        assert_eq!(phase_rate(0.0), 0);
        assert_eq!(phase_rate(2000.0), 1 << 30);
    }

    #[test]
    fn test_dds_starts_at_zero_phase() {
        let mut dds = Dds::new(CARRIER_NOMINAL_FREQ);
        let z = dds.next_f32();
        assert_eq!(z, Complex::new(1.0, 0.0));
        assert_eq!(dds.phase(), dds.rate());
    }

    #[test]
    fn test_dds_unit_amplitude() {
        let mut dds = Dds::new(CARRIER_NOMINAL_FREQ);
        for _ in 0..1000 {
            let z = dds.next_f32();
            assert!((z.norm() - 1.0).abs() < 1e-6, "magnitude {}", z.norm());
        }
    }

    #[test]
    fn test_dds_periodicity() {
        // 1800 Hz at 8000 Hz repeats every 40 samples (9 cycles)
        let mut dds = Dds::new(CARRIER_NOMINAL_FREQ);
        let first: Vec<Complex<f32>> = (0..40).map(|_| dds.next_f32()).collect();
        let second: Vec<Complex<f32>> = (0..40).map(|_| dds.next_f32()).collect();
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a - b).norm() < 1e-4);
        }
    }

    #[test]
    fn test_q15_matches_float() {
        let mut a = Dds::new(CARRIER_NOMINAL_FREQ);
        let mut b = Dds::new(CARRIER_NOMINAL_FREQ);
        for _ in 0..200 {
            let f = a.next_f32();
            let q = b.next_q15();
            assert!((f.re * 32767.0 - q.re as f32).abs() <= 1.0);
            assert!((f.im * 32767.0 - q.im as f32).abs() <= 1.0);
        }
    }

    #[test]
    fn test_dds_reset() {
        let mut dds = Dds::new(CARRIER_NOMINAL_FREQ);
        for _ in 0..123 {
            dds.next_q15();
        }
        dds.reset();
        assert_eq!(dds.phase(), 0);
        assert_eq!(dds.rate(), phase_rate(CARRIER_NOMINAL_FREQ));
    }
}
