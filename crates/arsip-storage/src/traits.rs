//! Tier error taxonomy
//!
//! A tier attempt either yields bytes or one of these conditions. For the device
//! tier every variant is an expected operating condition, consumed by the
//! resolver's loop as a miss; none of them aborts a resolution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TierError {
    #[error("File not found in tier: {0}")]
    NotFound(String),

    #[error("Device fetch timed out")]
    Timeout,

    #[error("Device connection refused: {0}")]
    Refused(String),

    #[error("Device returned status {0}")]
    Status(u16),

    #[error("Device returned an empty body")]
    EmptyBody,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tier backend error: {0}")]
    Backend(String),
}

impl TierError {
    /// Whether this condition should be treated as a miss and drive fallthrough
    /// to the next tier. Everything short of a local IO fault qualifies.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            TierError::NotFound(_)
                | TierError::Timeout
                | TierError::Refused(_)
                | TierError::Status(_)
                | TierError::EmptyBody
        )
    }
}

pub type TierResult<T> = Result<T, TierError>;
