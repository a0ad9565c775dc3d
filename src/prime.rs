//! Field modulus selection
//!
//! The modulus for a secret of `L` bytes is the smallest prime strictly
//! greater than `2^(8L)`. Both the splitting and the reconstructing side
//! derive it from a byte length alone, so it never travels with a share.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use tracing::{debug, trace};

/// Upper bound (exclusive) of the small-prime table used to sieve candidates
const SIEVE_LIMIT: usize = 1 << 18;

/// Upper bound (exclusive) of the primes [`is_probable_prime`] trial-divides by
const TRIAL_DIVISION_LIMIT: u32 = 2048;

/// Number of consecutive candidates sieved at once by [`next_prime`]
const SIEVE_WINDOW: usize = 4096;

/// Fixed Miller-Rabin witnesses. The first thirteen already make the test
/// exact below 3.3 * 10^24; the rest push the error bound far below 2^-80
/// for larger moduli while keeping the result a pure function of the input.
const WITNESSES: [u32; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

static SMALL_PRIMES: Lazy<Vec<u32>> = Lazy::new(|| {
    let mut composite = vec![false; SIEVE_LIMIT];
    let mut primes = Vec::new();
    for i in 2..SIEVE_LIMIT {
        if composite[i] {
            continue;
        }
        primes.push(i as u32);
        let mut j = i * i;
        while j < SIEVE_LIMIT {
            composite[j] = true;
            j += i;
        }
    }
    primes
});

/// Moduli already selected, keyed by secret length
static MODULI: Lazy<Mutex<HashMap<usize, BigUint>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the smallest prime strictly greater than `2^(8 * byte_length)`
///
/// A zero length yields 2. Results are cached per length, so splitting and
/// reconstructing secrets of the same size search only once per process.
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use prime_share::select_modulus;
///
/// assert_eq!(select_modulus(0), BigUint::from(2u32));
/// assert_eq!(select_modulus(1), BigUint::from(257u32));
/// assert_eq!(select_modulus(2), BigUint::from(65537u32));
/// ```
pub fn select_modulus(byte_length: usize) -> BigUint {
    let cached = MODULI
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&byte_length)
        .cloned();
    if let Some(modulus) = cached {
        return modulus;
    }

    // Searched without holding the lock; a concurrent search yields the same prime.
    let lower_bound = BigUint::one() << (8 * byte_length);
    let modulus = next_prime(&lower_bound);
    debug!(
        byte_length,
        modulus_bits = modulus.bits(),
        "selected field modulus"
    );

    MODULI
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(byte_length, modulus.clone());
    modulus
}

/// Returns the smallest prime strictly greater than `lower`
///
/// Candidates are sieved in windows by every prime below 2^18 using residues
/// of the window start, so only survivors pay for a modular exponentiation.
/// A survivor is first checked against base 2 alone; the remaining witnesses
/// run only on the candidate that passes.
pub fn next_prime(lower: &BigUint) -> BigUint {
    let start = lower + 1u32;

    // Below this every candidate may itself be a table prime; the plain
    // search is fast there anyway.
    if start.bits() <= 2 * SIEVE_LIMIT.trailing_zeros() as u64 {
        let mut candidate = start;
        while !is_probable_prime(&candidate) {
            candidate += 1u32;
        }
        return candidate;
    }

    sieve_search(start, SIEVE_WINDOW)
}

// Requires every candidate to exceed all table primes.
fn sieve_search(start: BigUint, window: usize) -> BigUint {
    let mut residues: Vec<usize> = SMALL_PRIMES
        .iter()
        .map(|&p| (&start % p).to_usize().unwrap_or(0))
        .collect();
    let mut base = start;
    let mut composite = vec![false; window];

    loop {
        composite.fill(false);
        for (&p, &r) in SMALL_PRIMES.iter().zip(&residues) {
            let p = p as usize;
            let mut offset = (p - r) % p;
            while offset < window {
                composite[offset] = true;
                offset += p;
            }
        }

        let mut tested = 0usize;
        for offset in (0..window).filter(|&k| !composite[k]) {
            let candidate = &base + offset as u64;
            tested += 1;
            if passes_witness(&candidate, WITNESSES[0]) && miller_rabin(&candidate) {
                trace!(offset, tested, "found prime in window");
                return candidate;
            }
        }
        trace!(tested, "window exhausted");

        base += window as u64;
        for (r, &p) in residues.iter_mut().zip(SMALL_PRIMES.iter()) {
            *r = (*r + window) % p as usize;
        }
    }
}

/// Primality test: trial division by every prime below 2048, then
/// Miller-Rabin over a fixed witness set
///
/// The answer is exact for every input below `2048^2` and below
/// `3.3 * 10^24`, and deterministic for all inputs.
pub fn is_probable_prime(n: &BigUint) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }

    for &p in SMALL_PRIMES.iter().take_while(|&&p| p < TRIAL_DIVISION_LIMIT) {
        if *n == BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // No factor below the trial bound, so anything under its square is prime.
    let bound = u64::from(TRIAL_DIVISION_LIMIT);
    if *n < BigUint::from(bound * bound) {
        return true;
    }

    miller_rabin(n)
}

// Requires n odd and larger than every witness.
fn miller_rabin(n: &BigUint) -> bool {
    WITNESSES.iter().all(|&a| passes_witness(n, a))
}

/// Strong probable-prime test of `n` to base `a`
fn passes_witness(n: &BigUint, a: u32) -> bool {
    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut x = BigUint::from(a).modpow(&d, n);
    if x == one || x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if x == n_minus_one {
            return true;
        }
    }
    false
}
