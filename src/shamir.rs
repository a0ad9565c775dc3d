use crate::codec;
use crate::config::Config;
use crate::error::{Result, ShamirError};
use crate::field::FieldContext;
use crate::lagrange::interpolate_at_zero;
use crate::polynomial::Polynomial;
use bytes::Bytes;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, trace};
use zeroize::Zeroizing;

/// A share in the threshold scheme: one point `(index, value)` on the
/// secret-encoding polynomial
///
/// A share does not record the modulus or the threshold. The modulus is
/// recomputed from `value_width`, which is one byte longer than the secret.
///
/// # Example
/// ```
/// use prime_share::ShamirShare;
///
/// let shamir = ShamirShare::builder(5, 3).build().unwrap();
/// let shares = shamir.split(b"secret").unwrap();
/// let share = &shares[0];
///
/// assert_eq!(share.index, 1);
/// assert_eq!(share.value_width, 7);
/// assert_eq!(share.secret_len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Index of the share (x-coordinate in the polynomial)
    pub index: u32,
    /// Polynomial value at `index` (y-coordinate)
    pub value: BigUint,
    /// Number of bytes the value is encoded with
    pub value_width: usize,
}

impl Share {
    /// Length of the secret this share belongs to
    pub fn secret_len(&self) -> usize {
        self.value_width.saturating_sub(1)
    }

    /// Encodes the share as a fixed-width record (see [`codec`])
    pub fn to_bytes(&self) -> Result<Bytes> {
        codec::encode(self.index, &self.value, self.value_width)
    }

    /// Decodes a share from a fixed-width record (see [`codec`])
    pub fn from_bytes(record: &[u8]) -> Result<Self> {
        let (index, value, value_width) = codec::decode(record)?;
        Ok(Self {
            index,
            value,
            value_width,
        })
    }
}

/// Threshold secret sharing over the prime field sized to the secret
///
/// A secret of `L` bytes is read as a little-endian integer and shared over
/// GF(p), where p is the smallest prime above `2^(8L)`. Each call to
/// [`split`](Self::split) seeds a fresh ChaCha20 generator from the operating
/// system, so no generator state outlives a single distribution.
///
/// # Example
/// ```
/// use prime_share::ShamirShare;
///
/// // Create a scheme with 5 total shares and threshold of 3
/// let scheme = ShamirShare::builder(5, 3).build().unwrap();
///
/// // Split a secret
/// let secret = b"my secret data";
/// let shares = scheme.split(secret).unwrap();
///
/// // Reconstruct with 3 shares
/// let reconstructed = ShamirShare::reconstruct(&shares[0..3]).unwrap();
/// assert_eq!(reconstructed, secret);
/// ```
#[derive(Debug, Clone)]
pub struct ShamirShare {
    /// Total number of shares to generate
    total_shares: u32,
    /// Number of polynomial coefficients, i.e. shares needed to reconstruct
    threshold: u32,
    /// Configuration options for the sharing scheme
    config: Config,
}

/// Builder for creating ShamirShare instances with custom configuration
///
/// # Example
/// ```
/// use prime_share::{CoefficientPolicy, Config, ShamirShare};
///
/// let config = Config::new().with_coefficient_policy(CoefficientPolicy::Unrestricted);
///
/// let shamir = ShamirShare::builder(5, 3)
///     .with_config(config)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ShamirShareBuilder {
    total_shares: u32,
    threshold: u32,
    config: Config,
}

impl ShamirShareBuilder {
    /// Creates a new builder with the specified parameters and default configuration
    ///
    /// # Arguments
    /// * `total_shares` - Total number of shares to create (n >= 1)
    /// * `threshold` - Shares required for reconstruction (1 <= t <= n)
    pub fn new(total_shares: u32, threshold: u32) -> Self {
        Self {
            total_shares,
            threshold,
            config: Config::default(),
        }
    }

    /// Sets a custom configuration for the ShamirShare instance
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the ShamirShare instance with validation
    ///
    /// # Errors
    /// - [`ShamirError::InvalidShareCount`] if `total_shares` is 0
    /// - [`ShamirError::InvalidThreshold`] if `threshold` is 0 or exceeds `total_shares`
    /// - [`ShamirError::InvalidConfig`] if the configuration is invalid
    pub fn build(self) -> Result<ShamirShare> {
        if self.total_shares == 0 {
            return Err(ShamirError::InvalidShareCount(self.total_shares));
        }
        if self.threshold == 0 || self.threshold > self.total_shares {
            return Err(ShamirError::InvalidThreshold {
                threshold: self.threshold,
                total_shares: self.total_shares,
            });
        }

        self.config.validate()?;

        Ok(ShamirShare {
            total_shares: self.total_shares,
            threshold: self.threshold,
            config: self.config,
        })
    }
}

impl ShamirShare {
    /// Creates a scheme with the default configuration
    ///
    /// Shorthand for `ShamirShare::builder(total_shares, threshold).build()`.
    pub fn new(total_shares: u32, threshold: u32) -> Result<Self> {
        Self::builder(total_shares, threshold).build()
    }

    /// Creates a builder for configuring a ShamirShare instance
    pub fn builder(total_shares: u32, threshold: u32) -> ShamirShareBuilder {
        ShamirShareBuilder::new(total_shares, threshold)
    }

    pub fn total_shares(&self) -> u32 {
        self.total_shares
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Splits a secret into `total_shares` shares with indices `1..=total_shares`
    ///
    /// All shares are computed in memory before this returns; a failure
    /// leaves nothing behind.
    ///
    /// # Errors
    /// - [`ShamirError::TooManyShares`] if the indices would collide modulo
    ///   the field prime (only possible for one-byte secrets and n > 256)
    /// - [`ShamirError::EntropyUnavailable`] if the OS random source fails
    ///
    /// # Example
    /// ```
    /// use prime_share::ShamirShare;
    ///
    /// let scheme = ShamirShare::builder(3, 2).build().unwrap();
    /// let shares = scheme.split(b"HI").unwrap();
    /// let indices: Vec<u32> = shares.iter().map(|s| s.index).collect();
    /// assert_eq!(indices, vec![1, 2, 3]);
    /// ```
    pub fn split(&self, secret: &[u8]) -> Result<Vec<Share>> {
        let field = FieldContext::for_secret_len(secret.len());
        self.check_share_count(&field)?;

        let mut rng = ChaCha20Rng::try_from_rng(&mut OsRng)
            .map_err(|e| ShamirError::EntropyUnavailable(e.to_string()))?;

        self.split_with_rng(secret, &field, &mut rng)
    }

    fn check_share_count(&self, field: &FieldContext) -> Result<()> {
        // An empty secret needs no distinct points: every share carries zero.
        if field.secret_len() > 0 && BigUint::from(self.total_shares) >= *field.modulus() {
            return Err(ShamirError::TooManyShares {
                total_shares: self.total_shares,
                modulus_bits: field.modulus().bits(),
            });
        }
        Ok(())
    }

    fn split_with_rng<R: RngCore + CryptoRng>(
        &self,
        secret: &[u8],
        field: &FieldContext,
        rng: &mut R,
    ) -> Result<Vec<Share>> {
        debug!(
            secret_len = secret.len(),
            total_shares = self.total_shares,
            threshold = self.threshold,
            "splitting secret"
        );

        let constant_term = field.from_bytes(secret);
        let polynomial = Polynomial::random(
            self.threshold as usize,
            &constant_term,
            field,
            self.config.coefficient_policy,
            rng,
        );

        let shares = (1..=self.total_shares)
            .map(|index| {
                trace!(index, "evaluating share");
                Share {
                    index,
                    value: polynomial.evaluate(index, field),
                    value_width: field.value_width(),
                }
            })
            .collect();

        Ok(shares)
    }

    /// Reconstructs the original secret from shares using Lagrange interpolation
    ///
    /// Every supplied share is used. The threshold is not recorded in the
    /// shares, so passing fewer than it returns a wrong secret without error.
    ///
    /// The interpolated value is truncated to the secret length, dropping the
    /// extra top byte. A corrupted share that shifts the value by exactly
    /// `2^(8L)` therefore goes unnoticed. This can only happen when the secret,
    /// read as a little-endian integer, is below `p - 2^(8L)`, which holds for
    /// just a handful of values per length (only zero for 1- and 2-byte
    /// secrets).
    ///
    /// # Errors
    /// - [`ShamirError::InsufficientPoints`] if no shares are given
    /// - [`ShamirError::InconsistentShareWidth`] if the shares disagree on width
    /// - [`ShamirError::DuplicateShareIndex`] if two shares share an index
    ///
    /// # Example
    /// ```
    /// use prime_share::ShamirShare;
    ///
    /// let scheme = ShamirShare::builder(5, 3).build().unwrap();
    /// let shares = scheme.split(b"data").unwrap();
    ///
    /// let secret = ShamirShare::reconstruct(&shares[2..5]).unwrap();
    /// assert_eq!(secret, b"data");
    /// ```
    pub fn reconstruct(shares: &[Share]) -> Result<Vec<u8>> {
        Self::reconstruct_with_config(shares, &Config::default())
    }

    /// Like [`reconstruct`](Self::reconstruct), but refuses fewer than
    /// `config.min_points` shares
    pub fn reconstruct_with_config(shares: &[Share], config: &Config) -> Result<Vec<u8>> {
        config.validate()?;
        if shares.len() < config.min_points {
            return Err(ShamirError::InsufficientPoints {
                needed: config.min_points,
                got: shares.len(),
            });
        }

        let value_width = shares[0].value_width;
        if let Some(bad) = shares.iter().find(|s| s.value_width != value_width) {
            return Err(ShamirError::InconsistentShareWidth {
                expected: value_width,
                found: bad.value_width,
            });
        }

        let mut seen = HashSet::with_capacity(shares.len());
        for share in shares {
            if !seen.insert(share.index) {
                return Err(ShamirError::DuplicateShareIndex(share.index));
            }
        }

        let field = FieldContext::for_value_width(value_width)?;
        debug!(
            shares = shares.len(),
            secret_len = field.secret_len(),
            "reconstructing secret"
        );

        // GF(2) only ever carries the empty secret.
        if field.secret_len() == 0 {
            return Ok(Vec::new());
        }

        let points: Vec<(u32, BigUint)> = shares
            .iter()
            .map(|s| (s.index, s.value.clone()))
            .collect();
        let secret = interpolate_at_zero(&points, &field)?;

        let mut bytes = Zeroizing::new(field.to_bytes(&secret, value_width)?);
        // The top byte only exists to hold values up to p - 1.
        bytes.truncate(field.secret_len());
        Ok(bytes.to_vec())
    }

    /// Decodes fixed-width records and reconstructs the secret from them
    ///
    /// # Example
    /// ```
    /// use prime_share::ShamirShare;
    ///
    /// let scheme = ShamirShare::new(3, 2).unwrap();
    /// let records: Vec<_> = scheme
    ///     .split(b"HI")
    ///     .unwrap()
    ///     .iter()
    ///     .map(|s| s.to_bytes().unwrap())
    ///     .collect();
    ///
    /// assert_eq!(ShamirShare::reconstruct_encoded(&records[1..]).unwrap(), b"HI");
    /// ```
    pub fn reconstruct_encoded<B: AsRef<[u8]>>(records: &[B]) -> Result<Vec<u8>> {
        let shares = records
            .iter()
            .map(|r| Share::from_bytes(r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::reconstruct(&shares)
    }
}
