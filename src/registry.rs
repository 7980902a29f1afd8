//! Darknode registry lookups and the point-in-time snapshot built from them
//!
//! Fragment construction never talks to the registry directly. It takes a
//! [`RegistrySnapshot`] captured once per order, so every pod and every key
//! comes from one coherent view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Address;
use crate::error::Result;

/// Addresses requested per `list_nodes` call
pub const DEFAULT_PAGE_SIZE: usize = 1024;

/// Read-only view of the darknode registry
pub trait Registry {
    /// Up to `limit` addresses starting at `offset`, registered or not
    fn list_nodes(&self, offset: usize, limit: usize) -> Result<Vec<Address>>;

    fn is_registered(&self, address: &Address) -> Result<bool>;

    fn minimum_pod_size(&self) -> Result<u64>;

    fn current_epoch(&self) -> Result<u64>;

    /// Registry encoding of the node's public key, if it published one
    fn public_key(&self, address: &Address) -> Result<Option<Vec<u8>>>;
}

/// One darknode as seen in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub address: Address,
    #[serde(default = "registered_by_default")]
    pub registered: bool,
    #[serde(default, with = "crate::ingress::base64_opt", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Vec<u8>>,
}

fn registered_by_default() -> bool {
    true
}

/// Immutable registry state for one fragment build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct RegistrySnapshot {
    epoch: u64,
    minimum_pod_size: u64,
    darknodes: Vec<NodeEntry>,
    /// First slot of each address in `darknodes`
    slots: HashMap<Address, usize>,
}

/// JSON form of a snapshot
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument {
    epoch: u64,
    minimum_pod_size: u64,
    darknodes: Vec<NodeEntry>,
}

impl From<SnapshotDocument> for RegistrySnapshot {
    fn from(doc: SnapshotDocument) -> Self {
        Self::new(doc.darknodes, doc.minimum_pod_size, doc.epoch)
    }
}

impl From<RegistrySnapshot> for SnapshotDocument {
    fn from(snapshot: RegistrySnapshot) -> Self {
        Self {
            epoch: snapshot.epoch,
            minimum_pod_size: snapshot.minimum_pod_size,
            darknodes: snapshot.darknodes,
        }
    }
}

impl RegistrySnapshot {
    #[must_use]
    pub fn new(darknodes: Vec<NodeEntry>, minimum_pod_size: u64, epoch: u64) -> Self {
        let mut slots = HashMap::with_capacity(darknodes.len());
        for (slot, node) in darknodes.iter().enumerate() {
            slots.entry(node.address).or_insert(slot);
        }
        Self {
            epoch,
            minimum_pod_size,
            darknodes,
            slots,
        }
    }

    /// Queries `registry` once for everything a build needs
    ///
    /// Pages through `list_nodes` until a short page comes back.
    ///
    /// # Errors
    /// Propagates the first failed lookup
    pub fn capture<R: Registry + ?Sized>(registry: &R, page_size: usize) -> Result<Self> {
        let page_size = page_size.max(1);
        let mut addresses = Vec::new();
        loop {
            let page = registry.list_nodes(addresses.len(), page_size)?;
            let done = page.len() < page_size;
            addresses.extend(page);
            if done {
                break;
            }
        }

        let darknodes = addresses
            .into_iter()
            .map(|address| {
                Ok(NodeEntry {
                    registered: registry.is_registered(&address)?,
                    public_key: registry.public_key(&address)?,
                    address,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(
            darknodes,
            registry.minimum_pod_size()?,
            registry.current_epoch()?,
        ))
    }

    #[must_use]
    pub fn darknodes(&self) -> &[NodeEntry] {
        &self.darknodes
    }

    #[must_use]
    pub fn minimum_pod_size(&self) -> u64 {
        self.minimum_pod_size
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Same darknodes under a different epoch
    #[must_use]
    pub fn with_epoch(&self, epoch: u64) -> Self {
        Self {
            epoch,
            ..self.clone()
        }
    }

    fn entry(&self, address: &Address) -> Option<&NodeEntry> {
        self.slots.get(address).map(|&slot| &self.darknodes[slot])
    }

    /// Whether `slot` holds the first occurrence of its address
    #[must_use]
    pub fn is_first_occurrence(&self, slot: usize) -> bool {
        self.darknodes
            .get(slot)
            .is_some_and(|node| self.slots.get(&node.address) == Some(&slot))
    }

    /// Published key bytes of `address`, if any
    #[must_use]
    pub fn public_key_of(&self, address: &Address) -> Option<&[u8]> {
        self.entry(address)?.public_key.as_deref()
    }
}

/// A snapshot answers registry queries from its own contents
impl Registry for RegistrySnapshot {
    fn list_nodes(&self, offset: usize, limit: usize) -> Result<Vec<Address>> {
        Ok(self
            .darknodes
            .iter()
            .skip(offset)
            .take(limit)
            .map(|node| node.address)
            .collect())
    }

    fn is_registered(&self, address: &Address) -> Result<bool> {
        Ok(self.entry(address).is_some_and(|node| node.registered))
    }

    fn minimum_pod_size(&self) -> Result<u64> {
        Ok(self.minimum_pod_size)
    }

    fn current_epoch(&self) -> Result<u64> {
        Ok(self.epoch)
    }

    fn public_key(&self, address: &Address) -> Result<Option<Vec<u8>>> {
        Ok(self.public_key_of(address).map(<[u8]>::to_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: u8) -> NodeEntry {
        NodeEntry {
            address: Address::new([i; 20]),
            registered: i % 2 == 0,
            public_key: (i % 3 == 0).then(|| vec![i; 8]),
        }
    }

    #[test]
    fn test_capture_pages_through_registry() {
        let source = RegistrySnapshot::new((0..10).map(node).collect(), 4, 99);
        for page_size in [1, 3, 10, 64] {
            let captured = RegistrySnapshot::capture(&source, page_size).unwrap();
            assert_eq!(captured, source);
        }
    }

    #[test]
    fn test_lookups() {
        let snapshot = RegistrySnapshot::new((0..4).map(node).collect(), 2, 1);
        assert!(snapshot.is_registered(&Address::new([2; 20])).unwrap());
        assert!(!snapshot.is_registered(&Address::new([1; 20])).unwrap());
        assert!(!snapshot.is_registered(&Address::new([9; 20])).unwrap());
        assert_eq!(snapshot.public_key_of(&Address::new([3; 20])), Some(&[3u8; 8][..]));
        assert_eq!(snapshot.public_key_of(&Address::new([1; 20])), None);
    }

    #[test]
    fn test_repeated_address_resolves_to_first_slot() {
        let mut nodes: Vec<NodeEntry> = (0..4).map(node).collect();
        nodes.push(NodeEntry {
            address: Address::new([0; 20]),
            registered: false,
            public_key: None,
        });
        let snapshot = RegistrySnapshot::new(nodes, 2, 0);

        assert!(snapshot.is_registered(&Address::new([0; 20])).unwrap());
        assert_eq!(snapshot.public_key_of(&Address::new([0; 20])), Some(&[0u8; 8][..]));
        assert!(snapshot.is_first_occurrence(0));
        assert!(!snapshot.is_first_occurrence(4));
        assert!(!snapshot.is_first_occurrence(5));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: RegistrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(!back.is_first_occurrence(4));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "epoch": 5,
            "minimumPodSize": 3,
            "darknodes": [
                {"address": "0x0101010101010101010101010101010101010101", "publicKey": "AAEAAQ=="},
                {"address": "0x0202020202020202020202020202020202020202", "registered": false}
            ]
        }"#;
        let snapshot: RegistrySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.epoch(), 5);
        assert!(snapshot.darknodes()[0].registered);
        assert_eq!(snapshot.darknodes()[0].public_key.as_deref(), Some(&[0u8, 1, 0, 1][..]));
        assert!(!snapshot.darknodes()[1].registered);
    }
}
