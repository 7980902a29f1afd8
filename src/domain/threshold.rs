//! Threshold newtype for secret splitting

use crate::error::{FragmentError, Result};

/// Number of shares required to reconstruct a secret (at least 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u64);

impl Threshold {
    /// Creates a new threshold, returning an error if value is 0
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] if the threshold is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fragmenter::domain::Threshold;
    ///
    /// let threshold = Threshold::new(3).unwrap();
    /// assert_eq!(*threshold, 3);
    ///
    /// assert!(Threshold::new(0).is_err());
    /// ```
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(FragmentError::InvalidParameters(
                "threshold must be at least 1".into(),
            ));
        }
        Ok(Self(value))
    }

    /// Reconstruction threshold for a pod of `pod_size` darknodes
    ///
    /// `floor(2 * (n + 1) / 3)`: tolerates `floor((n - 1) / 3)` faulty or
    /// absent nodes while still requiring a supermajority. Never exceeds
    /// `pod_size` and is at least 1 for any non-empty pod.
    ///
    /// ```rust
    /// use fragmenter::domain::{ShareCount, Threshold};
    ///
    /// let k = Threshold::byzantine(ShareCount::new(3).unwrap());
    /// assert_eq!(*k, 2);
    /// ```
    #[must_use]
    pub fn byzantine(pod_size: super::ShareCount) -> Self {
        let n = *pod_size;
        Self(2 * (n + 1) / 3)
    }
}

impl std::ops::Deref for Threshold {
    type Target = u64;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
