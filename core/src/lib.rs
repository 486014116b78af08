//! ITU-T V.17 modem transmitter
//!
//! Turns an application bit stream into 16-bit PCM samples at 8000 Hz: the
//! training handshake, trellis coded data at 7200/9600/12000/14400 bps, and
//! the shutdown sequence that follows the end of data.

pub mod error;
pub mod scrambler;
pub mod constellation;
pub mod training;
pub mod trellis;
pub mod source;
pub mod pulse_shaper;
pub mod carrier;
pub mod backend;
pub mod config;
pub mod transmitter;

pub use backend::{Backend, Fixed, Float};
pub use config::TxConfig;
pub use constellation::BitRate;
pub use error::{Result, V17Error};
pub use source::{AllOnes, BitBuffer, BitSource, FnBitSource, StatusSink, TxStatus};
pub use transmitter::{ActiveSource, TxState, V17Tx};

// Line signal configuration
pub const SAMPLE_RATE: u32 = 8000;
pub const BAUD_RATE: u32 = 2400;
pub const CARRIER_NOMINAL_FREQ: f32 = 1800.0;

// Baud clock: 3 parts per sample, a new baud every 10 parts (8000 / 2400 = 10 / 3)
pub const BAUD_PHASE_STEP: u32 = 3;
pub const BAUD_PHASE_WRAP: u32 = 10;

// Transmit level
pub const DBM0_MAX_POWER: f32 = 3.14 + 3.02;
pub const DEFAULT_TX_POWER_DBM0: f32 = -14.0;
