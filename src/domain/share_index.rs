//! `ShareIndex` newtype for secret splitting

use crate::error::{FragmentError, Result};

/// Share index (1-based x-coordinate of a share)
///
/// Index 0 is the secret itself and is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareIndex(u64);

impl ShareIndex {
    /// Creates a new share index
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] if index is 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fragmenter::domain::ShareIndex;
    ///
    /// let index = ShareIndex::new(1).unwrap();
    /// assert_eq!(*index, 1);
    ///
    /// // 0 would reveal the secret
    /// assert!(ShareIndex::new(0).is_err());
    /// ```
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(FragmentError::InvalidParameters(
                "share index 0 is reserved for the secret".into(),
            ));
        }
        Ok(Self(value))
    }
}

impl std::ops::Deref for ShareIndex {
    type Target = u64;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ShareIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
