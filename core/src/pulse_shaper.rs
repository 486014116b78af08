//! Root raised cosine pulse shaping at baseband
//!
//! The symbol stream is at 2400 baud and the output at 8000 samples/s, so each
//! output sample sits at one of ten fractional positions between bauds. There
//! is one set of coefficients per position, indexed by the baud phase
//! accumulator. Each set spans [`FILTER_STEPS`] bauds, oldest baud first.
//!
//! Prototype: root raised cosine, roll-off 0.25, centred 4.5 bauds into the
//! span, normalised to a centre tap of 1.0. Set `p` tap `i` is
//! `h((8 - i) + p / 10 - 4.5)`.

/// Bauds covered by the filter
pub const FILTER_STEPS: usize = 9;
/// Fractional baud positions, one per value of the baud phase accumulator
pub const COEFF_SETS: usize = 10;
/// Roll-off of the prototype
pub const RRC_ALPHA: f64 = 0.25;
/// Mean DC gain of one coefficient set
pub const PULSESHAPER_GAIN: f32 = 0.941_760_72;
/// Scale of the fixed point coefficients (Q12)
pub const PULSESHAPER_FIXED_SCALE: f32 = 4096.0;

pub static PULSESHAPER_FLOAT: [[f32; FILTER_STEPS]; COEFF_SETS] = [
    [-0.01712651, 0.06112098, -0.15940846, 0.58203843, 0.58203843, -0.15940846, 0.06112098, -0.01712651, -0.00274549],
    [-0.00559857, 0.03968997, -0.12083172, 0.43717690, 0.71741631, -0.18478514, 0.07792630, -0.02814796, 0.00298391],
    [0.00486397, 0.01675115, -0.07513264, 0.29228253, 0.83411788, -0.19131251, 0.08712907, -0.03693503, 0.00909232],
    [0.01302752, -0.00480752, -0.02821318, 0.15627872, 0.92399395, -0.17438187, 0.08629176, -0.04183016, 0.01459700],
    [0.01811688, -0.02263244, 0.01473688, 0.03685005, 0.98064806, -0.13098064, 0.07389642, -0.04148983, 0.01848456],
    [0.01986377, -0.03511451, 0.04965942, -0.06012970, 1.00000000, -0.06012970, 0.04965942, -0.03511451, 0.01986377],
    [0.01848456, -0.04148983, 0.07389642, -0.13098064, 0.98064806, 0.03685005, 0.01473688, -0.02263244, 0.01811688],
    [0.01459700, -0.04183016, 0.08629176, -0.17438187, 0.92399395, 0.15627872, -0.02821318, -0.00480752, 0.01302752],
    [0.00909232, -0.03693503, 0.08712907, -0.19131251, 0.83411788, 0.29228253, -0.07513264, 0.01675115, 0.00486397],
    [0.00298391, -0.02814796, 0.07792630, -0.18478514, 0.71741631, 0.43717690, -0.12083172, 0.03968997, -0.00559857],
];

/// [`PULSESHAPER_FLOAT`] in Q12
pub static PULSESHAPER_FIXED: [[i16; FILTER_STEPS]; COEFF_SETS] = [
    [-70, 250, -653, 2384, 2384, -653, 250, -70, -11],
    [-23, 163, -495, 1791, 2939, -757, 319, -115, 12],
    [20, 69, -308, 1197, 3417, -784, 357, -151, 37],
    [53, -20, -116, 640, 3785, -714, 353, -171, 60],
    [74, -93, 60, 151, 4017, -536, 303, -170, 76],
    [81, -144, 203, -246, 4096, -246, 203, -144, 81],
    [76, -170, 303, -536, 4017, 151, 60, -93, 74],
    [60, -171, 353, -714, 3785, 640, -116, -20, 53],
    [37, -151, 357, -784, 3417, 1197, -308, 69, 20],
    [12, -115, 319, -757, 2939, 1791, -495, 163, -23],
];

/// Circular history of the last [`FILTER_STEPS`] bauds
///
/// Every baud is stored twice, `FILTER_STEPS` apart, so the current span is
/// always one contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseShapeBuffer<P> {
    buf: [P; 2 * FILTER_STEPS],
    step: usize,
}

impl<P: Copy + Default> PulseShapeBuffer<P> {
    pub fn new() -> Self {
        Self {
            buf: [P::default(); 2 * FILTER_STEPS],
            step: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buf = [P::default(); 2 * FILTER_STEPS];
        self.step = 0;
    }

    /// Append a baud, dropping the oldest
    #[inline]
    pub fn push(&mut self, point: P) {
        self.buf[self.step] = point;
        self.buf[self.step + FILTER_STEPS] = point;
        self.step += 1;
        if self.step >= FILTER_STEPS {
            self.step = 0;
        }
    }

    /// The last [`FILTER_STEPS`] bauds, oldest first
    #[inline]
    pub fn span(&self) -> &[P] {
        &self.buf[self.step..self.step + FILTER_STEPS]
    }
}

impl<P: Copy + Default> Default for PulseShapeBuffer<P> {
    fn default() -> Self {
        Self::new()
    }
}
