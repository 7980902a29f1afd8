//! Error taxonomy for fragment construction

use thiserror::Error;

/// Fatal errors raised while preparing an order for submission
///
/// A node whose key is missing is not an error at this level: it is
/// recorded as a [`PartialPodFailure`](crate::fragments::PartialPodFailure)
/// and the build carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Bad share count, threshold or secret for splitting
    #[error("invalid secret sharing parameters: {0}")]
    InvalidParameters(String),

    /// An order field is outside its permitted range
    #[error("invalid order fields: {0}")]
    InvalidOrderFields(String),

    /// The registry snapshot lists no darknodes
    #[error("no darknodes available in registry snapshot")]
    NoNodesAvailable,

    /// The registry reports a minimum pod size of zero
    #[error("invalid minimum pod size: {0}")]
    InvalidPodSize(u64),

    /// A registry lookup failed before a snapshot could be taken
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Serialization, key parsing or encryption failed
    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result alias for fallible library operations
pub type Result<T, E = FragmentError> = std::result::Result<T, E>;
