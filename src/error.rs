//! 错误类型定义

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a RIFF container")]
    NotRiffContainer,

    #[error("Not a WAVE container")]
    NotWaveContainer,

    #[error("No format chunk found")]
    MissingFormatChunk,

    #[error("No data chunk found")]
    MissingDataChunk,

    #[error("Malformed format chunk: {length} bytes, need at least 16")]
    MalformedFormatChunk { length: u64 },

    #[error("No wave format available to size silence")]
    NoFormatAvailable,

    #[error("Cannot remove {requested} bytes from a {available}-byte payload")]
    RemovalExceedsPayload { requested: u64, available: u64 },

    #[error("Silence duration must be finite, got {0}")]
    InvalidSilenceDuration(f64),

    #[error("Container of {0} bytes does not fit 32-bit RIFF size fields")]
    SizeOverflow(u64),

    #[error("Data chunk offset {offset} is outside the {len}-byte buffer")]
    InvalidDataOffset { offset: usize, len: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
