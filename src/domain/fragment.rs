//! `OrderFragment`: one darknode's encrypted view of an order

use crate::codec;
use crate::crypto::Ciphertext;

use super::{Hash32, Order, OrderType, Parity, Settlement, ShareIndex};

/// Independently encrypted shares of a mantissa and an exponent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncryptedCoExp {
    pub co: Ciphertext,
    pub exp: Ciphertext,
}

impl EncryptedCoExp {
    fn is_deliverable(&self) -> bool {
        !self.co.is_empty() && !self.exp.is_empty()
    }
}

/// Order metadata in the clear plus this node's encrypted shares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFragment {
    id: Hash32,
    order_id: Hash32,
    order_type: OrderType,
    order_parity: Parity,
    order_settlement: Settlement,
    order_expiry: u64,
    order_signature: Option<Vec<u8>>,
    index: ShareIndex,
    tokens: Ciphertext,
    price: EncryptedCoExp,
    volume: EncryptedCoExp,
    minimum_volume: EncryptedCoExp,
    nonce: Ciphertext,
}

impl OrderFragment {
    /// Assembles a fragment and derives its id
    ///
    /// # Errors
    /// Returns [`FragmentError::EncodingError`](crate::error::FragmentError::EncodingError)
    /// if a ciphertext is too long for the fragment layout.
    pub fn new(
        order: &Order,
        index: ShareIndex,
        tokens: Ciphertext,
        price: EncryptedCoExp,
        volume: EncryptedCoExp,
        minimum_volume: EncryptedCoExp,
        nonce: Ciphertext,
    ) -> crate::error::Result<Self> {
        let mut fragment = Self {
            id: Hash32::default(),
            order_id: order.id(),
            order_type: order.order_type(),
            order_parity: order.parity(),
            order_settlement: order.settlement(),
            order_expiry: order.expiry(),
            order_signature: order.signature().map(<[u8]>::to_vec),
            index,
            tokens,
            price,
            volume,
            minimum_volume,
            nonce,
        };
        fragment.id = codec::fragment_id(&fragment)?;
        Ok(fragment)
    }

    /// False when any share could not be encrypted for the recipient
    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        !self.tokens.is_empty()
            && !self.nonce.is_empty()
            && self.price.is_deliverable()
            && self.volume.is_deliverable()
            && self.minimum_volume.is_deliverable()
    }

    #[must_use]
    pub fn id(&self) -> Hash32 {
        self.id
    }

    #[must_use]
    pub fn order_id(&self) -> Hash32 {
        self.order_id
    }

    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    #[must_use]
    pub fn order_parity(&self) -> Parity {
        self.order_parity
    }

    #[must_use]
    pub fn order_settlement(&self) -> Settlement {
        self.order_settlement
    }

    #[must_use]
    pub fn order_expiry(&self) -> u64 {
        self.order_expiry
    }

    #[must_use]
    pub fn order_signature(&self) -> Option<&[u8]> {
        self.order_signature.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> ShareIndex {
        self.index
    }

    #[must_use]
    pub fn tokens(&self) -> &Ciphertext {
        &self.tokens
    }

    #[must_use]
    pub fn price(&self) -> &EncryptedCoExp {
        &self.price
    }

    #[must_use]
    pub fn volume(&self) -> &EncryptedCoExp {
        &self.volume
    }

    #[must_use]
    pub fn minimum_volume(&self) -> &EncryptedCoExp {
        &self.minimum_volume
    }

    #[must_use]
    pub fn nonce(&self) -> &Ciphertext {
        &self.nonce
    }

    /// Ciphertexts in fragment layout order
    pub(crate) fn ciphertexts(&self) -> [&Ciphertext; 8] {
        [
            &self.tokens,
            &self.price.co,
            &self.price.exp,
            &self.volume.co,
            &self.volume.exp,
            &self.minimum_volume.co,
            &self.minimum_volume.exp,
            &self.nonce,
        ]
    }
}
