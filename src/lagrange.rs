use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::trace;

use crate::error::{Result, ShamirError};
use crate::field::FieldContext;

/// Interpolates the polynomial through `points` and returns its value at zero
///
/// Computes `sum_i y_i * prod_{j != i} x_j / (x_j - x_i)` over GF(p). Every
/// point is used; nothing checks that the count matches the threshold the
/// shares were made with, so too few points silently produce a wrong value.
///
/// # Errors
/// - [`ShamirError::InsufficientPoints`] if `points` is empty
/// - [`ShamirError::DuplicateShareIndex`] if two x values agree modulo p
pub fn interpolate_at_zero(points: &[(u32, BigUint)], field: &FieldContext) -> Result<BigUint> {
    if points.is_empty() {
        return Err(ShamirError::InsufficientPoints { needed: 1, got: 0 });
    }

    let xs: Vec<BigUint> = points
        .iter()
        .map(|(x, _)| field.reduce(&BigUint::from(*x)))
        .collect();

    for i in 0..xs.len() {
        for j in (i + 1)..xs.len() {
            if xs[i] == xs[j] {
                return Err(ShamirError::DuplicateShareIndex(points[j].0));
            }
        }
    }

    let mut secret = BigUint::zero();
    for (i, (index, y)) in points.iter().enumerate() {
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for (j, x_j) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = field.mul(&numerator, x_j);
            denominator = field.mul(&denominator, &field.sub(x_j, &xs[i]));
        }

        // Nonzero because the x values are pairwise distinct mod p.
        let inverse = field
            .inverse(&denominator)
            .ok_or(ShamirError::DuplicateShareIndex(*index))?;
        let basis = field.mul(&numerator, &inverse);
        secret = field.add(&secret, &field.mul(&field.reduce(y), &basis));
        trace!(index, "accumulated lagrange term");
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_recovers_constant_term() {
        let field = FieldContext::for_secret_len(2);
        // f(x) = 1234 + 17x + 99x^2
        let f = Polynomial::from_coefficients(vec![big(1234), big(17), big(99)], &field);
        let points: Vec<(u32, BigUint)> = [2u32, 5, 9].iter().map(|&x| (x, f.evaluate(x, &field))).collect();
        assert_eq!(interpolate_at_zero(&points, &field).unwrap(), big(1234));
    }

    #[test]
    fn test_extra_points_still_interpolate() {
        let field = FieldContext::for_secret_len(1);
        let f = Polynomial::from_coefficients(vec![big(42), big(200)], &field);
        let points: Vec<(u32, BigUint)> = (1..=6u32).map(|x| (x, f.evaluate(x, &field))).collect();
        assert_eq!(interpolate_at_zero(&points, &field).unwrap(), big(42));
    }

    #[test]
    fn test_single_point_returns_its_value() {
        let field = FieldContext::for_secret_len(1);
        let points = vec![(3u32, big(99))];
        assert_eq!(interpolate_at_zero(&points, &field).unwrap(), big(99));
    }

    #[test]
    fn test_values_reduced_before_use() {
        let field = FieldContext::for_secret_len(1);
        let points = vec![(1u32, big(257 + 10))];
        assert_eq!(interpolate_at_zero(&points, &field).unwrap(), big(10));
    }

    #[test]
    fn test_rejects_empty() {
        let field = FieldContext::for_secret_len(1);
        assert!(matches!(
            interpolate_at_zero(&[], &field),
            Err(ShamirError::InsufficientPoints { needed: 1, got: 0 })
        ));
    }

    #[test]
    fn test_rejects_duplicates() {
        let field = FieldContext::for_secret_len(1);
        let points = vec![(1u32, big(5)), (2, big(6)), (1, big(5))];
        assert!(matches!(
            interpolate_at_zero(&points, &field),
            Err(ShamirError::DuplicateShareIndex(1))
        ));
    }

    #[test]
    fn test_rejects_indices_equal_mod_p() {
        let field = FieldContext::for_secret_len(1); // p = 257
        let points = vec![(1u32, big(5)), (258, big(6))];
        assert!(matches!(
            interpolate_at_zero(&points, &field),
            Err(ShamirError::DuplicateShareIndex(258))
        ));
    }
}
