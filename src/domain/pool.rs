//! `Pool`: a pod of darknodes

use super::{Address, Hash32};

/// A pod: an ordered, duplicate-free list of darknodes and its id
///
/// Recomputed for every order from a fresh registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: Hash32,
    darknodes: Vec<Address>,
}

impl Pool {
    /// Creates a pod, deriving its id from the member addresses in order
    #[must_use]
    pub fn new(darknodes: Vec<Address>) -> Self {
        let id = crate::codec::pod_id(&darknodes);
        Self { id, darknodes }
    }

    #[must_use]
    pub fn id(&self) -> Hash32 {
        self.id
    }

    #[must_use]
    pub fn darknodes(&self) -> &[Address] {
        &self.darknodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.darknodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.darknodes.is_empty()
    }
}
