//! `ShareCount` newtype for secret splitting

use crate::error::{FragmentError, Result};

/// Number of shares to create (at least 1)
///
/// One share is produced per darknode in a pod, so the count tracks pod size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareCount(u64);

impl ShareCount {
    /// Minimum valid share count
    pub const MIN: u64 = 1;

    /// Creates a new share count
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] if count is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fragmenter::domain::ShareCount;
    ///
    /// let count = ShareCount::new(5).unwrap();
    /// assert_eq!(*count, 5);
    ///
    /// assert!(ShareCount::new(0).is_err());
    /// ```
    pub fn new(value: u64) -> Result<Self> {
        if value < Self::MIN {
            return Err(FragmentError::InvalidParameters(
                "share count must be at least 1".into(),
            ));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for ShareCount {
    type Target = u64;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
