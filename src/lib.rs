//! Threshold secret sharing over a prime field sized to the secret
//!
//! A secret of `L` bytes is split into `n` shares so that any `t` of them
//! reconstruct it exactly, while fewer reveal nothing about it. Arithmetic
//! happens in GF(p), where p is the smallest prime above `2^(8L)`. Each share
//! is a fixed-width record of a 4-byte index followed by an `L + 1` byte
//! value, so the modulus can be recomputed from the record length alone.
//!
//! Shares carry no integrity protection and no record of the threshold:
//! reconstructing from too few shares returns a wrong secret, not an error.
//!
//! # Quick Start
//!
//! ```
//! use prime_share::{FileShareStore, ShamirShare, ShareStore};
//!
//! // Create a scheme with 5 shares and threshold 3
//! let scheme = ShamirShare::new(5, 3).unwrap();
//!
//! // Split a secret
//! let secret = b"my secret data";
//! let shares = scheme.split(secret).unwrap();
//!
//! // Store shares
//! let temp_dir = tempfile::tempdir().unwrap();
//! let mut store = FileShareStore::new(temp_dir.path()).unwrap();
//! store.store_all(&shares).unwrap();
//!
//! // Reconstruct from 3 shares
//! let loaded_shares = vec![
//!     store.load_share(1).unwrap(),
//!     store.load_share(3).unwrap(),
//!     store.load_share(5).unwrap(),
//! ];
//! let reconstructed = ShamirShare::reconstruct(&loaded_shares).unwrap();
//! assert_eq!(reconstructed, secret);
//! ```

pub mod codec;
mod config;
mod error;
mod field;
mod lagrange;
mod polynomial;
mod prime;
mod shamir;
mod storage;

pub use config::{CoefficientPolicy, Config};
pub use error::{Result, ShamirError};
pub use field::FieldContext;
pub use lagrange::interpolate_at_zero;
pub use polynomial::Polynomial;
pub use prime::{is_probable_prime, next_prime, select_modulus};
pub use shamir::{ShamirShare, ShamirShareBuilder, Share};
pub use storage::{FileShareStore, ShareStore, read_share_file};

// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        CoefficientPolicy, Config, FileShareStore, Result, ShamirError, ShamirShare, Share,
        ShareStore,
    };
}
