//! Shamir secret sharing over a prime field
//!
//! A secret `s < PRIME` is hidden as the constant term of a random
//! polynomial of degree `k - 1`. Share `i` is the point `(i, f(i))` for
//! `i` in `1..=n`. Any `k` shares fix the polynomial; fewer reveal nothing.
//!
//! ```rust
//! use fragmenter::shamir;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = rand::rngs::OsRng;
//! let shares = shamir::split(5, 3, 1999, &mut rng)?;
//! assert_eq!(shares.len(), 5);
//! assert_eq!(shamir::join(&shares[1..4])?, 1999);
//! # Ok(())
//! # }
//! ```

pub mod field;

use rand::{CryptoRng, Rng};

use crate::domain::{ShareCount, ShareIndex, SplitConfig, Threshold};
use crate::error::{FragmentError, Result};

pub use field::{FieldElement, PRIME};

/// One point on a sharing polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    pub index: ShareIndex,
    pub value: FieldElement,
}

/// Splits `secret` into `n` shares, any `k` of which reconstruct it
///
/// Fresh coefficients are drawn from `rng` on every call, so splitting the
/// same secret twice yields different shares.
///
/// # Errors
/// Returns [`FragmentError::InvalidParameters`] if `n < 1`, `k < 1`,
/// `k > n` or `secret >= PRIME`
pub fn split<R: Rng + CryptoRng>(
    n: u64,
    k: u64,
    secret: u64,
    rng: &mut R,
) -> Result<Vec<Share>> {
    let config = SplitConfig::new(Threshold::new(k)?, ShareCount::new(n)?)?;
    split_with(config, secret, rng)
}

/// [`split`] with a pre-validated configuration
///
/// # Errors
/// Returns [`FragmentError::InvalidParameters`] if `secret >= PRIME`
pub fn split_with<R: Rng + CryptoRng>(
    config: SplitConfig,
    secret: u64,
    rng: &mut R,
) -> Result<Vec<Share>> {
    let secret = FieldElement::new(secret)?;

    let degree = *config.threshold() - 1;
    let mut coefficients = Vec::with_capacity(*config.threshold() as usize);
    coefficients.push(secret);
    for _ in 0..degree {
        coefficients.push(FieldElement::random(rng));
    }

    (1..=*config.share_count())
        .map(|i| {
            Ok(Share {
                index: ShareIndex::new(i)?,
                value: evaluate(&coefficients, FieldElement::reduce(i)),
            })
        })
        .collect()
}

/// Horner evaluation, lowest coefficient first
fn evaluate(coefficients: &[FieldElement], x: FieldElement) -> FieldElement {
    coefficients
        .iter()
        .rev()
        .fold(FieldElement::ZERO, |acc, &c| acc * x + c)
}

/// Reconstructs the secret from shares by Lagrange interpolation at zero
///
/// The result is only the original secret when at least the split
/// threshold of genuine shares is supplied; with fewer it is an unrelated
/// field element.
///
/// # Errors
/// Returns [`FragmentError::InvalidParameters`] for no shares or repeated
/// indices
pub fn join(shares: &[Share]) -> Result<u64> {
    if shares.is_empty() {
        return Err(FragmentError::InvalidParameters("no shares to join".into()));
    }

    let xs: Vec<FieldElement> = shares
        .iter()
        .map(|s| FieldElement::reduce(*s.index))
        .collect();

    let mut secret = FieldElement::ZERO;
    for (i, share) in shares.iter().enumerate() {
        let mut numerator = FieldElement::ONE;
        let mut denominator = FieldElement::ONE;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            if xj == xs[i] {
                return Err(FragmentError::InvalidParameters(format!(
                    "duplicate share index {}",
                    *share.index
                )));
            }
            numerator = numerator * xj;
            denominator = denominator * (xj - xs[i]);
        }
        secret = secret + share.value * numerator * denominator.inverse()?;
    }

    Ok(secret.value())
}
