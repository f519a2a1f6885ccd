// spooltag-rs/spooltag/src/error.rs

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("no card in field")]
    NoCard,

    #[error("card lost")]
    CardLost,

    #[error("operation timed out")]
    Timeout,

    #[error("authentication failed at block {block}")]
    AuthenticationFailed { block: u8 },

    #[error("read failed at block {block}")]
    ReadFailed { block: u8 },

    #[error("write failed at block {block}")]
    WriteFailed { block: u8 },

    #[error("invalid uid length: expected 4..=10, got {actual}")]
    InvalidUidLength { actual: usize },

    #[error("invalid sector: {0}")]
    InvalidSector(u8),

    #[error("invalid block: {0}")]
    InvalidBlock(u8),

    #[error("uid was not captured")]
    UidNotCaptured,

    #[error("tag type detection did not complete")]
    DetectionIncomplete,

    #[error("card is not writable (original access bits)")]
    NotWritable,

    #[error("unknown {kind} preset: {index}")]
    UnknownPreset { kind: &'static str, index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dump format error: {0}")]
    DumpFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that mean the card answered but refused our key.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
