use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum V17Error {
    #[error("Unsupported bit rate: {0} bps (expected 7200, 9600, 12000 or 14400)")]
    UnsupportedBitRate(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, V17Error>;
