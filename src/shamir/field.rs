//! Arithmetic over the prime field used for order shares
//!
//! Elements are `u64` values strictly below [`PRIME`]; products are formed
//! in `u128` before reduction, so no operation can overflow.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use rand::{CryptoRng, Rng};

use crate::error::{FragmentError, Result};

/// Field modulus shared with every darknode
pub const PRIME: u64 = 17_012_364_981_921_935_471;

/// An element of GF([`PRIME`])
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldElement(u64);

impl FieldElement {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Wraps `value`, rejecting anything outside the field
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] if `value >= PRIME`
    pub fn new(value: u64) -> Result<Self> {
        if value >= PRIME {
            return Err(FragmentError::InvalidParameters(format!(
                "{value} is not below the field prime {PRIME}"
            )));
        }
        Ok(Self(value))
    }

    /// Reduces an arbitrary `u64` into the field
    #[must_use]
    pub const fn reduce(value: u64) -> Self {
        Self(value % PRIME)
    }

    /// Uniformly random element
    pub fn random<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..PRIME))
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn pow(self, mut exponent: u64) -> Self {
        let mut base = self;
        let mut acc = Self::ONE;
        while exponent > 0 {
            if exponent & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exponent >>= 1;
        }
        acc
    }

    /// Multiplicative inverse by Fermat's little theorem
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] for zero
    pub fn inverse(self) -> Result<Self> {
        if self.0 == 0 {
            return Err(FragmentError::InvalidParameters(
                "zero has no inverse".into(),
            ));
        }
        Ok(self.pow(PRIME - 2))
    }
}

/// Uniformly random value below [`PRIME`], e.g. for an order nonce
pub fn random_element<R: Rng + CryptoRng>(rng: &mut R) -> u64 {
    FieldElement::random(rng).value()
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let sum = (u128::from(self.0) + u128::from(rhs.0)) % u128::from(PRIME);
        #[allow(clippy::cast_possible_truncation, reason = "reduced below PRIME")]
        let sum = sum as u64;
        Self(sum)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        if self.0 == 0 { self } else { Self(PRIME - self.0) }
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let product = (u128::from(self.0) * u128::from(rhs.0)) % u128::from(PRIME);
        #[allow(clippy::cast_possible_truncation, reason = "reduced below PRIME")]
        let product = product as u64;
        Self(product)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp({})", self.0)
    }
}
