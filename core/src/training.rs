//! V.17 training sequence
//!
//! All positions are in bauds, counted by a step counter that is incremented
//! before each training baud is generated. The counter is never decremented;
//! short training jumps it forward.

use log::debug;

use crate::constellation::{GridPoint, ABCD, ZERO_POINT};
use crate::scrambler::Scrambler;

/// Start of the optional talker echo protection tone
pub const SEG_TEP_A: u32 = 0;
/// Start of the silence following the echo protection tone
pub const SEG_TEP_B: u32 = SEG_TEP_A + 480;
/// Start of segment 1 (ABAB...)
pub const SEG_1: u32 = SEG_TEP_B + 48;
/// Start of segment 2 (scrambled CDBA...)
pub const SEG_2: u32 = SEG_1 + 256;
/// Start of segment 3 (bridge)
pub const SEG_3: u32 = SEG_2 + 2976;
/// Start of segment 4 (scrambled ones)
pub const SEG_4: u32 = SEG_3 + 64;
/// Where short training leaves segment 2 for segment 4
pub const SHORT_SEG_4: u32 = SEG_2 + 38;
/// Last baud of the training sequence
pub const TRAINING_END: u32 = SEG_4 + 48;
/// End of the scrambled ones sent after the last data bit
pub const SHUTDOWN_A: u32 = TRAINING_END + 32;
/// End of the shutdown silence. Nothing is sent past this point.
pub const SHUTDOWN_END: u32 = SHUTDOWN_A + 48;

/// 16 bit pattern scrambled two bits at a time during the bridge segment
pub const BRIDGE_WORD: u32 = 0x8880;

/// Scrambled dibit to training point during segment 2
const CDBA_TO_ABCD: [usize; 4] = [2, 3, 1, 0];
/// Scrambled dibit to phase step during the bridge segment
const DIBIT_TO_STEP: [usize; 4] = [1, 0, 2, 3];

/// Training progress of one transmitter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    step: u32,
    constellation_state: usize,
    short_train: bool,
    in_training: bool,
}

impl Training {
    /// Position the counter at the echo protection tone, or straight at segment 1
    pub fn new(tep: bool, short_train: bool) -> Self {
        Self {
            step: if tep { SEG_TEP_A } else { SEG_1 },
            constellation_state: 0,
            short_train,
            in_training: true,
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn in_training(&self) -> bool {
        self.in_training
    }

    pub fn short_train(&self) -> bool {
        self.short_train
    }

    pub(crate) fn set_in_training(&mut self, in_training: bool) {
        self.in_training = in_training;
    }

    /// Advance the counter by one baud and return its new value
    pub(crate) fn advance(&mut self) -> u32 {
        self.step += 1;
        self.step
    }

    /// True while the counter is short of segment 4 and the point comes from [`Training::next_point`]
    pub fn generates_points(&self) -> bool {
        self.step < SEG_4
    }

    /// Next point of segments TEP to 3. Only valid while [`Training::generates_points`] holds.
    pub fn next_point(&mut self, scrambler: &mut Scrambler) -> GridPoint {
        let step = self.advance();
        if step <= SEG_TEP_B {
            // Unmodulated carrier
            return ABCD[0];
        }
        if step <= SEG_1 {
            return ZERO_POINT;
        }
        if step <= SEG_2 {
            if step == SEG_1 + 1 {
                debug!("training segment 1 (ABAB) begins");
            }
            return ABCD[((step & 1) ^ 1) as usize];
        }
        if step <= SEG_3 {
            let bits = scrambler.scramble_dibit(1, 1);
            self.constellation_state = CDBA_TO_ABCD[bits];
            if self.short_train && step == SHORT_SEG_4 {
                debug!("short training: skipping to segment 4");
                self.step = SEG_4;
            }
            return ABCD[self.constellation_state];
        }
        // Bridge
        let shift = ((step - SEG_3 - 1) & 0x7) << 1;
        let bits = scrambler.scramble_dibit(BRIDGE_WORD >> shift, BRIDGE_WORD >> (shift + 1));
        self.constellation_state = (self.constellation_state + DIBIT_TO_STEP[bits]) & 3;
        ABCD[self.constellation_state]
    }
}
