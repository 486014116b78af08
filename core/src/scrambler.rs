/// Self-synchronising scrambler with the V.17 generating polynomial 1 + x^-18 + x^-23
///
/// Each output bit is the input XORed with register taps 17 and 22. The output
/// is then shifted into the register, so a receiver running the inverse
/// operation locks on after 23 bits whatever its starting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrambler {
    reg: u32,
}

/// Register contents loaded on every restart
pub const SCRAMBLER_SEED: u32 = 0x2E_CDD5;

impl Scrambler {
    pub fn new() -> Self {
        Self { reg: SCRAMBLER_SEED }
    }

    pub fn reset(&mut self) {
        self.reg = SCRAMBLER_SEED;
    }

    /// Scramble one bit. Only bit 0 of `in_bit` is used.
    #[inline]
    pub fn scramble(&mut self, in_bit: u32) -> u32 {
        let out_bit = (in_bit ^ (self.reg >> 17) ^ (self.reg >> 22)) & 1;
        self.reg = (self.reg << 1) | out_bit;
        out_bit
    }

    /// Scramble two bits and return them as a dibit, first bit in the high position
    #[inline]
    pub fn scramble_dibit(&mut self, first: u32, second: u32) -> usize {
        let hi = self.scramble(first);
        let lo = self.scramble(second);
        ((hi << 1) | lo) as usize
    }

    pub fn register(&self) -> u32 {
        self.reg
    }
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new()
    }
}
