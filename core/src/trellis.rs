/// Differential encoding of Q1 Q2 against the previous Y1 Y2 (index `(Q << 2) | previous`)
const DIFF_CODE: [u8; 16] = [0, 1, 2, 3, 1, 2, 3, 0, 2, 3, 0, 1, 3, 0, 1, 2];

/// V.17 differential and 8-state convolutional encoder
///
/// Maps the scrambled data bits of one baud to a constellation index of the
/// form `Q6 Q5 Q4 Q3 Y2 Y1 Y0`. Y1 Y2 are the differentially encoded Q1 Q2 and
/// Y0 is the redundant bit from the nonlinear rate 2/3 convolutional code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrellisEncoder {
    // Y1 Y2 of the previous baud
    diff: u8,
    // Delay elements of the convolutional encoder
    convolution: u8,
}

impl TrellisEncoder {
    pub fn new(initial_diff: u8) -> Self {
        Self {
            diff: initial_diff & 0x03,
            convolution: 0,
        }
    }

    pub fn reset(&mut self, initial_diff: u8) {
        self.diff = initial_diff & 0x03;
        self.convolution = 0;
    }

    /// Encode the data bits of one baud. Bit 0 of `q` is Q1.
    pub fn encode(&mut self, q: u32) -> usize {
        self.diff = DIFF_CODE[(((q & 0x03) << 2) as usize) | self.diff as usize];

        let y2 = self.diff >> 1;
        let y1 = self.diff;
        let s = self.convolution;
        let this2 = y2 ^ y1 ^ (s >> 2) ^ ((y2 ^ (s >> 1)) & s);
        let this1 = y2 ^ (s >> 1) ^ (y1 & s);
        self.convolution = ((s & 1) << 2) | ((this2 & 1) << 1) | (this1 & 1);

        (((q << 1) & 0x78) as usize) | ((self.diff as usize) << 1) | ((self.convolution >> 2) & 1) as usize
    }

    pub fn diff(&self) -> u8 {
        self.diff
    }

    pub fn convolution(&self) -> u8 {
        self.convolution
    }
}
