use std::io;
use thiserror::Error;

/// Error type for prime-field secret sharing operations
#[derive(Error, Debug)]
pub enum ShamirError {
    /// Invalid total shares count (must be >= 1)
    #[error("Invalid share count {0}")]
    InvalidShareCount(u32),

    /// Threshold is zero or exceeds the total share count
    #[error("Invalid threshold {threshold} for {total_shares} shares")]
    InvalidThreshold { threshold: u32, total_shares: u32 },

    /// Evaluation points 1..=n would collide modulo the field prime
    #[error("{total_shares} shares do not fit in a {modulus_bits}-bit field")]
    TooManyShares { total_shares: u32, modulus_bits: u64 },

    /// The operating system entropy source could not be read
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// A share record is truncated or otherwise unparsable
    #[error("Malformed share: {0}")]
    MalformedShare(String),

    /// Shares disagree on the width of their encoded value
    #[error("Inconsistent share width: expected {expected} bytes, found {found}")]
    InconsistentShareWidth { expected: usize, found: usize },

    /// Two shares carry the same evaluation point
    #[error("Duplicate share index {0}")]
    DuplicateShareIndex(u32),

    /// Not enough points to interpolate
    #[error("Need at least {needed} shares, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    /// General I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No share with the requested index exists in the store
    #[error("Share {0} not found")]
    ShareNotFound(u32),

    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, ShamirError>;
