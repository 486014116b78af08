//! V.17 signal constellations
//!
//! Points are held as integer grid coordinates. The numeric backends scale
//! them to their own baseband representation.
//!
//! Table index layout is `Q6 Q5 Q4 Q3 Y2 Y1 Y0`: Y0 is the redundant
//! convolutional bit, Y1 Y2 the differentially encoded pair, Q the uncoded
//! high bits. Every group of eight entries that shares Q is built from two base
//! points and their quarter-turn rotations, so rotating the line signal by 90
//! degrees only moves a point within its own group.

use std::fmt;

use crate::error::{Result, V17Error};

/// Integer constellation coordinate (in-phase, quadrature)
pub type GridPoint = (i8, i8);

pub const ZERO_POINT: GridPoint = (0, 0);

/// Training points A, B, C, D (segments 1 to 3 of the training sequence)
pub const ABCD: [GridPoint; 4] = [
    (-6, -2), // A
    (2, -6),  // B
    (6, 2),   // C
    (-2, 6),  // D
];

const fn rotate_cw((re, im): GridPoint) -> GridPoint {
    (im, -re)
}

const fn rotate_ccw((re, im): GridPoint) -> GridPoint {
    (-im, re)
}

const fn negate((re, im): GridPoint) -> GridPoint {
    (-re, -im)
}

/// Lay out groups of eight from their base point pairs
const fn expand<const G: usize, const N: usize>(groups: [[GridPoint; 2]; G]) -> [GridPoint; N] {
    let mut table = [ZERO_POINT; N];
    let mut g = 0;
    while g < G {
        let a = groups[g][0];
        let b = groups[g][1];
        let base = g * 8;
        table[base] = a;
        table[base + 1] = b;
        table[base + 2] = rotate_cw(b);
        table[base + 3] = rotate_cw(a);
        table[base + 4] = negate(a);
        table[base + 5] = negate(b);
        table[base + 6] = rotate_ccw(b);
        table[base + 7] = rotate_ccw(a);
        g += 1;
    }
    table
}

/// 128 point cross, x + y odd. Within each group the second base point is
/// the first negated and moved by (1, -1).
const GROUPS_14400: [[GridPoint; 2]; 16] = [
    [(-8, -3), (9, 2)],
    [(-8, 1), (9, -2)],
    [(-4, -3), (5, 2)],
    [(-4, 1), (5, -2)],
    [(4, -3), (-3, 2)],
    [(4, 1), (-3, -2)],
    [(0, -3), (1, 2)],
    [(0, 1), (1, -2)],
    [(8, -3), (-7, 2)],
    [(8, 1), (-7, -2)],
    [(-4, -7), (5, 6)],
    [(-4, 5), (5, -6)],
    [(4, -7), (-3, 6)],
    [(4, 5), (-3, -6)],
    [(0, -7), (1, 6)],
    [(0, 5), (1, -6)],
];

/// 64 point square, both coordinates odd. The second base point is the first
/// negated and moved by (2, 0).
const GROUPS_12000: [[GridPoint; 2]; 8] = [
    [(7, 1), (-5, -1)],
    [(7, -7), (-5, 7)],
    [(-5, 5), (7, -5)],
    [(-1, -7), (3, 7)],
    [(3, 5), (-1, -5)],
    [(-5, -3), (7, 3)],
    [(3, -3), (-1, 3)],
    [(-1, 1), (3, -1)],
];

/// 32 point cross, even coordinates with (x + y) / 2 odd
const GROUPS_9600: [[GridPoint; 2]; 4] = [
    [(-8, 2), (-6, -4)],
    [(0, 2), (-6, 4)],
    [(0, -6), (2, -4)],
    [(8, 2), (2, 4)],
];

/// 16 point square on +-2, +-6. The second base point is the first negated
/// and moved by (4, 0).
const GROUPS_7200: [[GridPoint; 2]; 2] = [
    [(6, -6), (-2, 6)],
    [(-2, 2), (6, -2)],
];

pub static CONSTELLATION_14400: [GridPoint; 128] = expand(GROUPS_14400);
pub static CONSTELLATION_12000: [GridPoint; 64] = expand(GROUPS_12000);
pub static CONSTELLATION_9600: [GridPoint; 32] = expand(GROUPS_9600);
pub static CONSTELLATION_7200: [GridPoint; 16] = expand(GROUPS_7200);

/// Supported V.17 data rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitRate {
    Bps7200,
    Bps9600,
    Bps12000,
    Bps14400,
}

impl BitRate {
    pub const ALL: [BitRate; 4] = [
        BitRate::Bps7200,
        BitRate::Bps9600,
        BitRate::Bps12000,
        BitRate::Bps14400,
    ];

    pub fn bps(self) -> u32 {
        match self {
            BitRate::Bps7200 => 7200,
            BitRate::Bps9600 => 9600,
            BitRate::Bps12000 => 12000,
            BitRate::Bps14400 => 14400,
        }
    }

    /// Data bits carried by each baud
    pub fn bits_per_symbol(self) -> usize {
        match self {
            BitRate::Bps7200 => 3,
            BitRate::Bps9600 => 4,
            BitRate::Bps12000 => 5,
            BitRate::Bps14400 => 6,
        }
    }

    /// Constellation indexed by the trellis encoder output
    pub fn constellation(self) -> &'static [GridPoint] {
        match self {
            BitRate::Bps7200 => &CONSTELLATION_7200,
            BitRate::Bps9600 => &CONSTELLATION_9600,
            BitRate::Bps12000 => &CONSTELLATION_12000,
            BitRate::Bps14400 => &CONSTELLATION_14400,
        }
    }
}

impl TryFrom<u32> for BitRate {
    type Error = V17Error;

    fn try_from(bps: u32) -> Result<Self> {
        match bps {
            7200 => Ok(BitRate::Bps7200),
            9600 => Ok(BitRate::Bps9600),
            12000 => Ok(BitRate::Bps12000),
            14400 => Ok(BitRate::Bps14400),
            other => Err(V17Error::UnsupportedBitRate(other)),
        }
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.bps())
    }
}
