//! Configuration validation for secret splits

use crate::error::{FragmentError, Result};

use super::{ShareCount, Threshold};

/// Validated pair of threshold and share count
///
/// Enforces the invariant that threshold <= `share_count` at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    threshold: Threshold,
    share_count: ShareCount,
}

impl SplitConfig {
    /// Creates a new split configuration
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] if threshold exceeds share count
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fragmenter::domain::{SplitConfig, Threshold, ShareCount};
    ///
    /// let config = SplitConfig::new(
    ///     Threshold::new(3).unwrap(),
    ///     ShareCount::new(5).unwrap()
    /// ).unwrap();
    ///
    /// assert_eq!(*config.threshold(), 3);
    /// assert_eq!(*config.share_count(), 5);
    ///
    /// let result = SplitConfig::new(
    ///     Threshold::new(5).unwrap(),
    ///     ShareCount::new(3).unwrap()
    /// );
    /// assert!(result.is_err());
    /// ```
    pub fn new(threshold: Threshold, share_count: ShareCount) -> Result<Self> {
        if *threshold > *share_count {
            return Err(FragmentError::InvalidParameters(format!(
                "threshold {} cannot exceed share count {}",
                *threshold, *share_count
            )));
        }
        Ok(Self {
            threshold,
            share_count,
        })
    }

    /// Split configuration for a pod of `pod_size` darknodes
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidParameters`] for an empty pod
    pub fn for_pod(pod_size: usize) -> Result<Self> {
        let share_count = ShareCount::new(pod_size as u64)?;
        Self::new(Threshold::byzantine(share_count), share_count)
    }

    /// Gets the threshold value
    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Gets the share count value
    #[must_use]
    pub fn share_count(&self) -> ShareCount {
        self.share_count
    }
}
