use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::config::CoefficientPolicy;
use crate::field::FieldContext;

/// A polynomial over GF(p), stored as coefficients from the constant term up
///
/// The sharing polynomial has `threshold` coefficients: the constant term is
/// the secret, the rest are uniform random field elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Builds a polynomial from coefficients (constant term first), reducing
    /// each into the field
    pub fn from_coefficients(coefficients: Vec<BigUint>, field: &FieldContext) -> Self {
        Self {
            coefficients: coefficients.iter().map(|c| field.reduce(c)).collect(),
        }
    }

    /// Generates a random polynomial with `threshold` coefficients and the
    /// given constant term
    ///
    /// Coefficients `1..threshold` are drawn independently and uniformly from
    /// the field. Under [`CoefficientPolicy::NonZeroLeading`] the last one is
    /// redrawn until nonzero, so a threshold of `t >= 2` always yields degree
    /// exactly `t - 1`.
    pub fn random<R: RngCore + CryptoRng>(
        threshold: usize,
        constant_term: &BigUint,
        field: &FieldContext,
        policy: CoefficientPolicy,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold.max(1));
        coefficients.push(field.reduce(constant_term));

        for j in 1..threshold {
            let leading = j == threshold - 1;
            let coefficient = match policy {
                CoefficientPolicy::NonZeroLeading if leading => field.random_nonzero_element(rng),
                _ => field.random_element(rng),
            };
            coefficients.push(coefficient);
        }

        Self { coefficients }
    }

    /// The coefficients, constant term first
    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    /// The constant term, i.e. the value at zero
    pub fn constant_term(&self) -> BigUint {
        self.coefficients.first().cloned().unwrap_or_default()
    }

    /// Degree of the polynomial, ignoring zero high-order coefficients
    ///
    /// The zero polynomial reports degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    /// Evaluates the polynomial at `x` using Horner's method
    pub fn evaluate(&self, x: u32, field: &FieldContext) -> BigUint {
        let x = field.reduce(&BigUint::from(x));
        self.coefficients
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, c| field.add(&field.mul(&acc, &x), c))
    }
}
