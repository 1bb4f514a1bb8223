use fprep_dsa::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FprepError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("header row has no line terminator")]
    MissingHeader,
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("test sample percentage {0} outside 1..=100")]
    InvalidSamplePercent(usize),
    #[error("no bit template for multiplier {0}")]
    UnknownMultiplier(u32),
    #[error("bit width {0} outside 1..=31")]
    InvalidBitWidth(u32),
    #[error("{0} is not one of 5, 25, 125")]
    InvalidPowerOfFive(u32),
    #[error("{field} must be a single byte, got {value:?}")]
    InvalidByte { field: &'static str, value: String },
    #[error("malformed multiplication parameters {0:?}, expected M,P")]
    MalformedParams(String),
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FprepError>;
