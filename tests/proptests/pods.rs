//! Property tests for pod assignment

use std::collections::HashSet;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use fragmenter::domain::Address;
use fragmenter::pods::assign_pods;
use fragmenter::registry::{NodeEntry, RegistrySnapshot};

/// Wrapper for registries with distinct addresses and a random epoch
#[derive(Clone, Debug)]
struct ArbitraryRegistry(RegistrySnapshot);

impl Arbitrary for ArbitraryRegistry {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = u8::arbitrary(g) % 40 + 1; // 1..=40
        let nodes = (0..count)
            .map(|i| {
                let mut bytes = [0u8; 20];
                bytes[0] = i;
                bytes[1..9].copy_from_slice(&u64::arbitrary(g).to_be_bytes());
                NodeEntry {
                    address: Address::new(bytes),
                    registered: u8::arbitrary(g) % 5 != 0,
                    public_key: None,
                }
            })
            .collect();
        let minimum_pod_size = u64::from(u8::arbitrary(g) % 8) + 1;
        ArbitraryRegistry(RegistrySnapshot::new(nodes, minimum_pod_size, u64::arbitrary(g)))
    }
}

fn all_registered(snapshot: &RegistrySnapshot) -> RegistrySnapshot {
    let nodes = snapshot
        .darknodes()
        .iter()
        .cloned()
        .map(|node| NodeEntry {
            registered: true,
            ..node
        })
        .collect();
    RegistrySnapshot::new(nodes, snapshot.minimum_pod_size(), snapshot.epoch())
}

/// Same snapshot, same pods and pod ids
#[quickcheck]
fn prop_assignment_deterministic(registry: ArbitraryRegistry) -> bool {
    let ArbitraryRegistry(snapshot) = registry;
    match (assign_pods(&snapshot), assign_pods(&snapshot)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(a), Err(b)) => a == b,
        _ => false,
    }
}

/// Every registered node lands in exactly one pod; unregistered nodes never do
#[quickcheck]
fn prop_registered_nodes_partitioned(registry: ArbitraryRegistry) -> bool {
    let ArbitraryRegistry(snapshot) = registry;
    let Ok(pods) = assign_pods(&snapshot) else {
        // only possible when nothing is registered
        return snapshot.darknodes().iter().all(|n| !n.registered);
    };

    let assigned: Vec<Address> = pods.iter().flat_map(|p| p.darknodes().to_vec()).collect();
    let unique: HashSet<Address> = assigned.iter().copied().collect();
    let registered: HashSet<Address> = snapshot
        .darknodes()
        .iter()
        .filter(|n| n.registered)
        .map(|n| n.address)
        .collect();

    assigned.len() == unique.len() && unique == registered
}

/// Pod count follows the minimum pod size and pods are balanced
#[quickcheck]
fn prop_pod_sizes_balanced(registry: ArbitraryRegistry) -> bool {
    let snapshot = all_registered(&registry.0);
    let total = snapshot.darknodes().len() as u64;
    let expected = (total / snapshot.minimum_pod_size()).max(1);
    let pods = assign_pods(&snapshot).unwrap();

    let sizes: Vec<usize> = pods.iter().map(|p| p.len()).collect();
    let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
    pods.len() as u64 == expected && max - min <= 1
}

/// A different epoch residue moves a different node to the head of the first pod
#[quickcheck]
fn prop_epoch_rotates_membership(registry: ArbitraryRegistry, shift: u64) -> bool {
    let snapshot = all_registered(&registry.0);
    let total = snapshot.darknodes().len() as u64;
    if total < 2 {
        return true;
    }
    let shift = shift % (total - 1) + 1; // 1..total
    let rotated = snapshot.with_epoch(snapshot.epoch().wrapping_add(shift));
    if rotated.epoch() % total == snapshot.epoch() % total {
        // wrapped around u64::MAX onto the same residue
        return true;
    }

    let before = assign_pods(&snapshot).unwrap();
    let after = assign_pods(&rotated).unwrap();
    before[0].darknodes()[0] != after[0].darknodes()[0] && before[0].id() != after[0].id()
}
