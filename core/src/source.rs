//! Capabilities the transmitter calls out to: where data bits come from and
//! who hears about protocol milestones.

use std::collections::VecDeque;

/// Supplies the bits to transmit, one per call
pub trait BitSource {
    /// Next bit, or `None` once the data is exhausted.
    ///
    /// `None` is not an error. It starts the shutdown sequence.
    fn next_bit(&mut self) -> Option<bool>;
}

/// Milestones reported to the [`StatusSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// The bit source ran dry and the shutdown sequence has begun
    EndOfData,
    /// The shutdown sequence has been sent in full
    ShutdownComplete,
}

/// Receives transmitter milestones. Each fires at most once per run.
pub trait StatusSink {
    fn status(&mut self, status: TxStatus);
}

impl<F: FnMut(TxStatus)> StatusSink for F {
    fn status(&mut self, status: TxStatus) {
        self(status)
    }
}

/// Endless ones. Drives training segment 4 and the shutdown sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllOnes;

impl BitSource for AllOnes {
    fn next_bit(&mut self) -> Option<bool> {
        Some(true)
    }
}

/// A finite bit queue that reports end of data once drained
#[derive(Debug, Clone, Default)]
pub struct BitBuffer {
    bits: VecDeque<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes are sent least significant bit first
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.push_bytes(data);
        buffer
    }

    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    pub fn push_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            for i in 0..8 {
                self.bits.push_back((byte >> i) & 1 == 1);
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.bits.len()
    }
}

impl BitSource for BitBuffer {
    fn next_bit(&mut self) -> Option<bool> {
        self.bits.pop_front()
    }
}

/// Adapts a closure into a [`BitSource`]
pub struct FnBitSource<F>(pub F);

impl<F: FnMut() -> Option<bool>> BitSource for FnBitSource<F> {
    fn next_bit(&mut self) -> Option<bool> {
        (self.0)()
    }
}
