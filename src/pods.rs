//! Epoch-seeded partitioning of darknodes into pods
//!
//! Every participant derives the same pods from the same registry state
//! without coordinating: the epoch picks a starting slot and a stride, and
//! nodes are dealt round-robin into `max(1, total / minimum_pod_size)` pods.

use crate::domain::{Address, Pool};
use crate::error::{FragmentError, Result};
use crate::registry::RegistrySnapshot;

/// Partitions the snapshot's darknodes into pods
///
/// Unregistered nodes are skipped, and a repeated address only counts in its
/// first slot. If there are fewer nodes than the minimum pod size a single
/// undersized pod is returned; pods that would end up empty are dropped.
///
/// # Errors
/// - [`FragmentError::NoNodesAvailable`] if the snapshot has no darknodes,
///   or none of them is registered
/// - [`FragmentError::InvalidPodSize`] if the minimum pod size is zero
pub fn assign_pods(snapshot: &RegistrySnapshot) -> Result<Vec<Pool>> {
    let nodes = snapshot.darknodes();
    if nodes.is_empty() {
        return Err(FragmentError::NoNodesAvailable);
    }
    let minimum_pod_size = snapshot.minimum_pod_size();
    if minimum_pod_size == 0 {
        return Err(FragmentError::InvalidPodSize(minimum_pod_size));
    }

    let total = nodes.len();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "quotient is at most the node count, which is a usize"
    )]
    let number_of_pods = ((total as u64) / minimum_pod_size).max(1) as usize;

    let eligible: Vec<bool> = nodes
        .iter()
        .enumerate()
        .map(|(slot, node)| node.registered && snapshot.is_first_occurrence(slot))
        .collect();
    let assignable = eligible.iter().filter(|&&e| e).count();
    if assignable == 0 {
        return Err(FragmentError::NoNodesAvailable);
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "remainder is below the node count, which is a usize"
    )]
    let stride = (snapshot.epoch() % total as u64) as usize;
    let mut cursor = stride;
    let mut used = vec![false; total];
    let mut members: Vec<Vec<Address>> = vec![Vec::new(); number_of_pods];

    for i in 0..assignable {
        // terminates: fewer than `assignable` slots are used so far
        while !eligible[cursor] || used[cursor] {
            cursor = (cursor + 1) % total;
        }
        members[i % number_of_pods].push(nodes[cursor].address);
        used[cursor] = true;
        cursor = (cursor + stride) % total;
    }

    Ok(members
        .into_iter()
        .filter(|pod| !pod.is_empty())
        .map(Pool::new)
        .collect())
}
