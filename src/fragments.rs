//! Turning one order into encrypted fragments for every pod
//!
//! For each pod of `n` darknodes, every secret order value is split into `n`
//! shares with threshold `floor(2 * (n + 1) / 3)`, and node `i` receives the
//! `i`-th share of each value encrypted under its own key.
//!
//! A node without a usable key still gets a fragment slot, but with empty
//! ciphertexts; the problem is reported as a [`PartialPodFailure`] and the
//! rest of the build proceeds.

use std::collections::BTreeMap;

use rand::{CryptoRng, Rng};
use thiserror::Error;

use crate::codec;
use crate::crypto::{self, Ciphertext, NodeKey, SHARE_BYTE_WIDTH};
use crate::domain::{Address, EncryptedCoExp, Hash32, Order, OrderFragment, Pool, ShareIndex, SplitConfig};
use crate::error::Result;
use crate::pods;
use crate::registry::RegistrySnapshot;
use crate::shamir::{self, Share};

/// Number of secret values split per order
const SECRET_VALUES: usize = 8;

/// Why a darknode's fragment could not be encrypted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("darknode has no public key in the registry")]
    MissingKey,
    #[error("darknode public key is unusable: {0}")]
    InvalidKey(String),
    #[error("share encryption failed: {0}")]
    Encryption(String),
}

/// One undeliverable fragment; the build itself still succeeds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pod {pod}: fragment {index} for {darknode} undeliverable: {reason}")]
pub struct PartialPodFailure {
    pub pod: Hash32,
    pub darknode: Address,
    pub index: ShareIndex,
    pub reason: FailureReason,
}

/// Fragments of one order, grouped by pod id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSet {
    order_id: Hash32,
    pods: BTreeMap<Hash32, Vec<OrderFragment>>,
    failures: Vec<PartialPodFailure>,
}

impl FragmentSet {
    #[must_use]
    pub fn order_id(&self) -> Hash32 {
        self.order_id
    }

    /// Every fragment, deliverable or not, sorted by index within each pod
    #[must_use]
    pub fn pods(&self) -> &BTreeMap<Hash32, Vec<OrderFragment>> {
        &self.pods
    }

    #[must_use]
    pub fn failures(&self) -> &[PartialPodFailure] {
        &self.failures
    }

    /// Fragments fit for submission, grouped by pod id
    #[must_use]
    pub fn deliverable(&self) -> BTreeMap<Hash32, Vec<&OrderFragment>> {
        self.pods
            .iter()
            .map(|(pod, fragments)| {
                let ready = fragments.iter().filter(|f| f.is_deliverable()).collect();
                (*pod, ready)
            })
            .collect()
    }
}

struct PodFragments {
    pod: Hash32,
    fragments: Vec<OrderFragment>,
    failures: Vec<PartialPodFailure>,
}

/// Builds one fragment per darknode per pod for `order`
///
/// Pods are computed from `snapshot`; the snapshot is not re-read for
/// anything else except node keys.
///
/// # Errors
/// - [`FragmentError::InvalidOrderFields`](crate::error::FragmentError::InvalidOrderFields)
///   if the order fails verification
/// - [`FragmentError::NoNodesAvailable`](crate::error::FragmentError::NoNodesAvailable) /
///   [`FragmentError::InvalidPodSize`](crate::error::FragmentError::InvalidPodSize)
///   for an unusable snapshot
/// - [`FragmentError::EncodingError`](crate::error::FragmentError::EncodingError)
///   if a fragment cannot be serialized
pub fn build<R: Rng + CryptoRng>(
    order: &Order,
    snapshot: &RegistrySnapshot,
    rng: &mut R,
) -> Result<FragmentSet> {
    let order_id = codec::verify_order(&order.to_params())?;
    let pools = pods::assign_pods(snapshot)?;

    let built = pools
        .iter()
        .map(|pool| build_pod(order, pool, snapshot, rng))
        .collect::<Result<Vec<_>>>()?;

    let mut set = FragmentSet {
        order_id,
        pods: BTreeMap::new(),
        failures: Vec::new(),
    };
    for mut pod in built {
        pod.fragments.sort_by_key(OrderFragment::index);
        set.failures.extend(pod.failures);
        set.pods.insert(pod.pod, pod.fragments);
    }
    Ok(set)
}

fn build_pod<R: Rng + CryptoRng>(
    order: &Order,
    pool: &Pool,
    snapshot: &RegistrySnapshot,
    rng: &mut R,
) -> Result<PodFragments> {
    let config = SplitConfig::for_pod(pool.len())?;
    let secrets: [u64; SECRET_VALUES] = [
        order.tokens(),
        order.price().co,
        order.price().exp,
        order.volume().co,
        order.volume().exp,
        order.minimum_volume().co,
        order.minimum_volume().exp,
        order.nonce(),
    ];
    let shares = secrets
        .iter()
        .map(|&secret| shamir::split_with(config, secret, rng))
        .collect::<Result<Vec<_>>>()?;

    let mut fragments = Vec::with_capacity(pool.len());
    let mut failures = Vec::new();
    for (position, darknode) in pool.darknodes().iter().enumerate() {
        let node_shares: [Share; SECRET_VALUES] = std::array::from_fn(|v| shares[v][position]);
        let index = node_shares[0].index;

        let ciphertexts = node_key(snapshot, darknode)
            .and_then(|key| encrypt_node(&key, &node_shares, rng))
            .unwrap_or_else(|reason| {
                failures.push(PartialPodFailure {
                    pod: pool.id(),
                    darknode: *darknode,
                    index,
                    reason,
                });
                Default::default()
            });

        let [tokens, price_co, price_exp, volume_co, volume_exp, min_co, min_exp, nonce] = ciphertexts;
        fragments.push(OrderFragment::new(
            order,
            index,
            tokens,
            EncryptedCoExp { co: price_co, exp: price_exp },
            EncryptedCoExp { co: volume_co, exp: volume_exp },
            EncryptedCoExp { co: min_co, exp: min_exp },
            nonce,
        )?);
    }

    Ok(PodFragments {
        pod: pool.id(),
        fragments,
        failures,
    })
}

fn node_key(snapshot: &RegistrySnapshot, darknode: &Address) -> Result<NodeKey, FailureReason> {
    let bytes = snapshot
        .public_key_of(darknode)
        .ok_or(FailureReason::MissingKey)?;
    NodeKey::from_bytes(bytes).map_err(|e| FailureReason::InvalidKey(e.to_string()))
}

fn encrypt_node<R: Rng + CryptoRng>(
    key: &NodeKey,
    shares: &[Share; SECRET_VALUES],
    rng: &mut R,
) -> Result<[Ciphertext; SECRET_VALUES], FailureReason> {
    let mut out: [Ciphertext; SECRET_VALUES] = Default::default();
    for (slot, share) in out.iter_mut().zip(shares) {
        *slot = crypto::encrypt(Some(key), *share.index, share.value.value(), SHARE_BYTE_WIDTH, rng)
            .map_err(|e| FailureReason::Encryption(e.to_string()))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoExp, OrderParams, OrderType, Parity, Settlement};
    use crate::error::FragmentError;
    use crate::registry::NodeEntry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    fn key_bytes() -> &'static [u8] {
        static KEY: OnceLock<Vec<u8>> = OnceLock::new();
        KEY.get_or_init(|| {
            let mut rng = ChaCha20Rng::seed_from_u64(11);
            let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
            NodeKey::from(private.to_public_key()).to_bytes().unwrap()
        })
    }

    fn order() -> Order {
        Order::new(OrderParams {
            order_type: OrderType::Limit,
            parity: Parity::Buy,
            settlement: Settlement::RenEx,
            expiry: 1_800_000_000,
            tokens: 0x0000_0001_0000_0100,
            price: CoExp::new(1500, 40),
            volume: CoExp::new(20, 12),
            minimum_volume: CoExp::new(2, 12),
            nonce: 77,
            signature: None,
            id: None,
        })
        .unwrap()
    }

    fn snapshot(count: u8, minimum_pod_size: u64, keyed: impl Fn(u8) -> bool) -> RegistrySnapshot {
        let nodes = (1..=count)
            .map(|i| NodeEntry {
                address: Address::new([i; 20]),
                registered: true,
                public_key: keyed(i).then(|| key_bytes().to_vec()),
            })
            .collect();
        RegistrySnapshot::new(nodes, minimum_pod_size, 3)
    }

    #[test]
    fn test_one_fragment_per_node() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let set = build(&order(), &snapshot(6, 3, |_| true), &mut rng).unwrap();

        assert_eq!(set.order_id(), order().id());
        assert_eq!(set.pods().len(), 2);
        assert!(set.failures().is_empty());
        for fragments in set.pods().values() {
            let indices: Vec<u64> = fragments.iter().map(|f| *f.index()).collect();
            assert_eq!(indices, vec![1, 2, 3]);
            assert!(fragments.iter().all(OrderFragment::is_deliverable));
            assert!(fragments.iter().all(|f| f.order_id() == set.order_id()));
        }
    }

    #[test]
    fn test_missing_key_is_isolated() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let set = build(&order(), &snapshot(3, 3, |i| i != 2), &mut rng).unwrap();

        assert_eq!(set.failures().len(), 1);
        let failure = &set.failures()[0];
        assert_eq!(failure.darknode, Address::new([2; 20]));
        assert_eq!(failure.reason, FailureReason::MissingKey);

        let fragments = set.pods().values().next().unwrap();
        assert_eq!(fragments.len(), 3);
        let undeliverable: Vec<_> = fragments.iter().filter(|f| !f.is_deliverable()).collect();
        assert_eq!(undeliverable.len(), 1);
        assert_eq!(undeliverable[0].index(), failure.index);
        assert!(undeliverable[0].price().co.is_empty());

        let ready: usize = set.deliverable().values().map(Vec::len).sum();
        assert_eq!(ready, 2);
    }

    #[test]
    fn test_garbage_key_is_isolated() {
        let mut nodes = snapshot(3, 3, |_| true).darknodes().to_vec();
        nodes[0].public_key = Some(vec![1, 2, 3]);
        let snapshot = RegistrySnapshot::new(nodes, 3, 0);

        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let set = build(&order(), &snapshot, &mut rng).unwrap();
        assert_eq!(set.failures().len(), 1);
        assert!(matches!(set.failures()[0].reason, FailureReason::InvalidKey(_)));
    }

    #[test]
    fn test_unusable_snapshot_is_fatal() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let empty = RegistrySnapshot::new(Vec::new(), 3, 0);
        assert_eq!(
            build(&order(), &empty, &mut rng),
            Err(FragmentError::NoNodesAvailable)
        );
    }
}
