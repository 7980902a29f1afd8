//! JSON documents handed to the ingress transport
//!
//! Open requests carry every deliverable fragment grouped by pod id; cancel
//! requests carry an order id and a detached signature over
//! [`cancel_message`]. Signing happens in the wallet, outside this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Address, EncryptedCoExp, Hash32, OrderFragment};
use crate::fragments::FragmentSet;

/// Prefix of the message a trader signs to open an order
pub const OPEN_PREFIX: &[u8] = b"Republic Protocol: open: ";

/// Prefix of the message a trader signs to cancel an order
pub const CANCEL_PREFIX: &[u8] = b"Republic Protocol: cancel: ";

/// Bytes a trader signs to open `order_id`
#[must_use]
pub fn open_message(order_id: Hash32) -> Vec<u8> {
    [OPEN_PREFIX, order_id.as_bytes().as_slice()].concat()
}

/// Bytes a trader signs to cancel `order_id`
#[must_use]
pub fn cancel_message(order_id: Hash32) -> Vec<u8> {
    [CANCEL_PREFIX, order_id.as_bytes().as_slice()].concat()
}

/// One fragment as the ingress expects it
///
/// Metadata travels as decimal strings, byte fields as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFragment {
    pub id: Hash32,
    pub order_id: Hash32,
    pub order_type: String,
    pub order_parity: String,
    pub order_settlement: String,
    /// Unix seconds
    pub order_expiry: String,
    /// Empty when the order is unsigned, as in the fragment id preimage
    #[serde(with = "base64_bytes")]
    pub order_signature: Vec<u8>,
    pub index: String,
    pub tokens: String,
    pub price: [String; 2],
    pub volume: [String; 2],
    pub minimum_volume: [String; 2],
    pub nonce: String,
}

fn pair(value: &EncryptedCoExp) -> [String; 2] {
    [value.co.to_base64(), value.exp.to_base64()]
}

impl From<&OrderFragment> for WireFragment {
    fn from(fragment: &OrderFragment) -> Self {
        Self {
            id: fragment.id(),
            order_id: fragment.order_id(),
            order_type: fragment.order_type().to_u8().to_string(),
            order_parity: fragment.order_parity().to_u8().to_string(),
            order_settlement: fragment.order_settlement().to_u32().to_string(),
            order_expiry: fragment.order_expiry().to_string(),
            order_signature: fragment.order_signature().unwrap_or_default().to_vec(),
            index: fragment.index().to_string(),
            tokens: fragment.tokens().to_base64(),
            price: pair(fragment.price()),
            volume: pair(fragment.volume()),
            minimum_volume: pair(fragment.minimum_volume()),
            nonce: fragment.nonce().to_base64(),
        }
    }
}

/// Request body submitting an order's fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrderRequest {
    pub address: Address,
    pub order_fragment_mappings: Vec<BTreeMap<Hash32, Vec<WireFragment>>>,
}

impl OpenOrderRequest {
    /// Wire form of every deliverable fragment in `set`
    ///
    /// Pods whose fragments are all undeliverable are left out entirely.
    #[must_use]
    pub fn new(address: Address, set: &FragmentSet) -> Self {
        let mapping = set
            .deliverable()
            .into_iter()
            .filter(|(_, fragments)| !fragments.is_empty())
            .map(|(pod, fragments)| {
                (pod, fragments.into_iter().map(WireFragment::from).collect())
            })
            .collect();
        Self {
            address,
            order_fragment_mappings: vec![mapping],
        }
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.order_fragment_mappings
            .iter()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// Request body cancelling an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub address: Address,
    pub order_id: Hash32,
    /// Signature over [`cancel_message`]
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

/// Serde adapter for byte strings as standard base64
pub(crate) mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// [`base64_bytes`] for optional fields
pub(crate) mod base64_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => super::base64_bytes::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::base64_bytes")] Vec<u8>);

        Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(bytes)| bytes))
    }
}
