use crate::constellation::BitRate;
use crate::error::{Result, V17Error};
use crate::DEFAULT_TX_POWER_DBM0;

/// Settings for one transmitter run
#[derive(Debug, Clone, PartialEq)]
pub struct TxConfig {
    /// Data rate in bits per second (7200, 9600, 12000 or 14400)
    pub bit_rate: u32,
    /// Send the talker echo protection tone before training
    pub tep: bool,
    /// Use the short training sequence (only valid after a long one on the same call)
    pub short_train: bool,
    /// Transmit level in dBm0
    pub power_dbm0: f32,
}

impl TxConfig {
    /// Check every field and return the parsed bit rate
    pub fn validate(&self) -> Result<BitRate> {
        if !self.power_dbm0.is_finite() {
            return Err(V17Error::InvalidConfig(format!(
                "transmit power must be finite, got {}",
                self.power_dbm0
            )));
        }
        BitRate::try_from(self.bit_rate)
    }
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            bit_rate: 9600,
            tep: false,
            short_train: false,
            power_dbm0: DEFAULT_TX_POWER_DBM0,
        }
    }
}
