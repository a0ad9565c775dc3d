use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Result, ShamirError};
use crate::prime::select_modulus;

/// Arithmetic context for GF(p), where p is chosen from the secret length
///
/// Every field operation takes the context explicitly, so two sharing
/// operations over different moduli can run side by side without touching
/// any process-wide state. Elements are plain [`BigUint`] values kept in
/// `0..p`.
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use prime_share::FieldContext;
///
/// let field = FieldContext::for_secret_len(1); // p = 257
/// let a = BigUint::from(200u32);
/// let b = BigUint::from(100u32);
/// assert_eq!(field.add(&a, &b), BigUint::from(43u32));
/// assert_eq!(field.mul(&a, &field.inverse(&a).unwrap()), BigUint::from(1u32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContext {
    modulus: BigUint,
    secret_len: usize,
}

impl FieldContext {
    /// Builds the field used to share a secret of `secret_len` bytes
    pub fn for_secret_len(secret_len: usize) -> Self {
        Self {
            modulus: select_modulus(secret_len),
            secret_len,
        }
    }

    /// Builds the field matching an encoded value width (`secret_len + 1`)
    pub fn for_value_width(value_width: usize) -> Result<Self> {
        if value_width == 0 {
            return Err(ShamirError::MalformedShare(
                "share value width cannot be zero".into(),
            ));
        }
        Ok(Self::for_secret_len(value_width - 1))
    }

    /// The prime modulus p
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Length in bytes of the secrets this field carries
    pub fn secret_len(&self) -> usize {
        self.secret_len
    }

    /// Width in bytes of an encoded field element
    pub fn value_width(&self) -> usize {
        self.secret_len + 1
    }

    #[inline]
    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.modulus
    }

    #[inline]
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    #[inline]
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce(a);
        let b = self.reduce(b);
        (a + &self.modulus - b) % &self.modulus
    }

    #[inline]
    pub fn neg(&self, a: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), a)
    }

    #[inline]
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Multiplicative inverse via Fermat's little theorem: `a^(p-2) mod p`
    ///
    /// Returns `None` for elements congruent to zero.
    pub fn inverse(&self, a: &BigUint) -> Option<BigUint> {
        let a = self.reduce(a);
        if a.is_zero() {
            return None;
        }
        let exponent = &self.modulus - 2u32;
        Some(a.modpow(&exponent, &self.modulus))
    }

    /// Interprets little-endian bytes as an integer and reduces it into the field
    pub fn from_bytes(&self, bytes: &[u8]) -> BigUint {
        self.reduce(&BigUint::from_bytes_le(bytes))
    }

    /// Serializes an element into exactly `width` little-endian bytes
    pub fn to_bytes(&self, a: &BigUint, width: usize) -> Result<Vec<u8>> {
        to_le_bytes_fixed(a, width)
    }

    /// Draws a uniform element of `0..p` by rejection sampling
    ///
    /// Candidates are `bits(p)`-bit integers, so each draw is accepted with
    /// probability above one half.
    pub fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        let bits = self.modulus.bits();
        let byte_len = bits.div_ceil(8) as usize;
        let top_mask = match bits % 8 {
            0 => 0xFF,
            rem => (1u8 << rem) - 1,
        };
        let mut buf = vec![0u8; byte_len];
        loop {
            rng.fill_bytes(&mut buf);
            if let Some(top) = buf.last_mut() {
                *top &= top_mask;
            }
            let candidate = BigUint::from_bytes_le(&buf);
            if candidate < self.modulus {
                buf.zeroize();
                return candidate;
            }
        }
    }

    /// Draws a uniform element of `1..p`
    pub fn random_nonzero_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        loop {
            let candidate = self.random_element(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }
}

/// Writes `value` as exactly `width` little-endian bytes, zero-extended on the
/// high end
pub(crate) fn to_le_bytes_fixed(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let mut bytes = value.to_bytes_le();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    if bytes.len() > width {
        return Err(ShamirError::MalformedShare(format!(
            "value needs {} bytes but the share width is {width}",
            bytes.len()
        )));
    }
    bytes.resize(width, 0);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn small_field() -> FieldContext {
        FieldContext::for_secret_len(1)
    }

    #[test]
    fn test_context_sizes() {
        let field = FieldContext::for_secret_len(2);
        assert_eq!(field.modulus(), &BigUint::from(65537u32));
        assert_eq!(field.secret_len(), 2);
        assert_eq!(field.value_width(), 3);

        let same = FieldContext::for_value_width(3).unwrap();
        assert_eq!(same, field);
        assert!(FieldContext::for_value_width(0).is_err());
    }

    #[test]
    fn test_add_sub_wrap() {
        let field = small_field();
        let a = BigUint::from(250u32);
        let b = BigUint::from(10u32);
        assert_eq!(field.add(&a, &b), BigUint::from(3u32));
        assert_eq!(field.sub(&b, &a), BigUint::from(17u32));
        assert_eq!(field.sub(&a, &b), BigUint::from(240u32));
        assert_eq!(field.neg(&b), BigUint::from(247u32));
        assert_eq!(field.neg(&BigUint::zero()), BigUint::zero());
    }

    #[test]
    fn test_mul() {
        let field = small_field();
        let a = BigUint::from(256u32); // -1
        assert_eq!(field.mul(&a, &a), BigUint::one());
        assert_eq!(
            field.mul(&BigUint::from(16u32), &BigUint::from(17u32)),
            BigUint::from(15u32)
        );
    }

    #[test]
    fn test_all_inverses() {
        let field = small_field();
        for a in 1u32..257 {
            let a = BigUint::from(a);
            let inv = field.inverse(&a).unwrap();
            assert_eq!(field.mul(&a, &inv), BigUint::one());
        }
        assert!(field.inverse(&BigUint::zero()).is_none());
        assert!(field.inverse(&BigUint::from(257u32)).is_none());
    }

    #[test]
    fn test_inverse_in_binary_field() {
        let field = FieldContext::for_secret_len(0);
        assert_eq!(field.modulus(), &BigUint::from(2u32));
        assert_eq!(field.inverse(&BigUint::one()), Some(BigUint::one()));
        assert_eq!(field.inverse(&BigUint::from(2u32)), None);
    }

    #[test]
    fn test_byte_conversion() {
        let field = FieldContext::for_secret_len(2);
        let v = field.from_bytes(&[0x48, 0x49]);
        assert_eq!(v, BigUint::from(0x4948u32));
        assert_eq!(field.to_bytes(&v, 3).unwrap(), vec![0x48, 0x49, 0x00]);
        assert_eq!(field.to_bytes(&BigUint::zero(), 0).unwrap(), Vec::<u8>::new());
        assert_eq!(field.to_bytes(&BigUint::zero(), 2).unwrap(), vec![0, 0]);
        assert!(field.to_bytes(&BigUint::from(0x10000u32), 2).is_err());
    }

    #[test]
    fn test_random_elements_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for len in [0usize, 1, 2, 5] {
            let field = FieldContext::for_secret_len(len);
            for _ in 0..200 {
                assert!(field.random_element(&mut rng) < *field.modulus());
                let nz = field.random_nonzero_element(&mut rng);
                assert!(!nz.is_zero() && nz < *field.modulus());
            }
        }
    }

    #[test]
    fn test_random_elements_cover_binary_field() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let field = FieldContext::for_secret_len(0);
        let draws: Vec<BigUint> = (0..64).map(|_| field.random_element(&mut rng)).collect();
        assert!(draws.iter().any(|v| v.is_zero()));
        assert!(draws.iter().any(|v| v.is_one()));
    }
}
