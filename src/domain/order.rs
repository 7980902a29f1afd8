//! Order value types
//!
//! An [`Order`] is immutable once built: its id is derived from its fields at
//! construction, and every `with_*` method returns a fresh order with a fresh
//! id. [`OrderParams`] is the unchecked input that deserializes from JSON.

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Result;
use crate::shamir::field;

use super::Hash32;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Executes at the midpoint of the best bid and ask
    Midpoint,
    /// Executes at the given price or better
    Limit,
}

impl OrderType {
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Midpoint => 0,
            OrderType::Limit => 1,
        }
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Buy,
    Sell,
}

impl Parity {
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Parity::Buy => 0,
            Parity::Sell => 1,
        }
    }
}

/// Settlement layer the order is matched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Settlement {
    RenEx,
    RenExAtomic,
}

impl Settlement {
    #[must_use]
    pub fn to_u32(self) -> u32 {
        match self {
            Settlement::RenEx => 1,
            Settlement::RenExAtomic => 2,
        }
    }
}

/// Fixed-precision quantity `co × base^exp`
///
/// Not a float: both halves are small integers that are secret-shared
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoExp {
    pub co: u64,
    pub exp: u64,
}

impl CoExp {
    #[must_use]
    pub const fn new(co: u64, exp: u64) -> Self {
        Self { co, exp }
    }
}

/// Unchecked order fields, as read from a request or file
///
/// `id` is only ever supplied to be checked against the derived one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParams {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub parity: Parity,
    pub settlement: Settlement,
    /// Unix seconds
    pub expiry: u64,
    /// Packed pair of token codes
    pub tokens: u64,
    pub price: CoExp,
    pub volume: CoExp,
    pub minimum_volume: CoExp,
    pub nonce: u64,
    #[serde(default, with = "crate::ingress::base64_opt", skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Hash32>,
}

/// A validated order with its derived id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    params: OrderParams,
    id: Hash32,
}

impl Order {
    /// Validates `params` and derives the order id
    ///
    /// # Errors
    /// Returns [`FragmentError::InvalidOrderFields`](crate::error::FragmentError::InvalidOrderFields)
    /// if any field is out of bounds or a supplied id does not match.
    pub fn new(params: OrderParams) -> Result<Self> {
        let id = codec::verify_order(&params)?;
        Ok(Self {
            params: OrderParams { id: None, ..params },
            id,
        })
    }

    /// Like [`Order::new`], replacing the nonce with a fresh field element
    ///
    /// # Errors
    /// See [`Order::new`]
    pub fn with_random_nonce<R: Rng + CryptoRng>(mut params: OrderParams, rng: &mut R) -> Result<Self> {
        params.nonce = field::random_element(rng);
        params.id = None;
        Self::new(params)
    }

    fn rebuild(&self, edit: impl FnOnce(&mut OrderParams)) -> Result<Self> {
        let mut params = self.params.clone();
        edit(&mut params);
        Self::new(params)
    }

    /// Same order at a different price
    ///
    /// # Errors
    /// See [`Order::new`]
    pub fn with_price(&self, price: CoExp) -> Result<Self> {
        self.rebuild(|p| p.price = price)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_order_type(&self, order_type: OrderType) -> Result<Self> {
        self.rebuild(|p| p.order_type = order_type)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_parity(&self, parity: Parity) -> Result<Self> {
        self.rebuild(|p| p.parity = parity)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_settlement(&self, settlement: Settlement) -> Result<Self> {
        self.rebuild(|p| p.settlement = settlement)
    }

    /// # Errors
    /// Returns [`FragmentError::InvalidOrderFields`](crate::error::FragmentError::InvalidOrderFields)
    /// if `tokens` is not below the field prime
    pub fn with_tokens(&self, tokens: u64) -> Result<Self> {
        self.rebuild(|p| p.tokens = tokens)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_volume(&self, volume: CoExp) -> Result<Self> {
        self.rebuild(|p| p.volume = volume)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_minimum_volume(&self, minimum_volume: CoExp) -> Result<Self> {
        self.rebuild(|p| p.minimum_volume = minimum_volume)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_expiry(&self, expiry: u64) -> Result<Self> {
        self.rebuild(|p| p.expiry = expiry)
    }

    /// # Errors
    /// See [`Order::new`]
    pub fn with_nonce(&self, nonce: u64) -> Result<Self> {
        self.rebuild(|p| p.nonce = nonce)
    }

    /// Attaches a signature; the id does not cover it and is unchanged
    #[must_use]
    pub fn with_signature(&self, signature: Vec<u8>) -> Self {
        Self {
            params: OrderParams {
                signature: Some(signature),
                ..self.params.clone()
            },
            id: self.id,
        }
    }

    #[must_use]
    pub fn id(&self) -> Hash32 {
        self.id
    }

    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.params.order_type
    }

    #[must_use]
    pub fn parity(&self) -> Parity {
        self.params.parity
    }

    #[must_use]
    pub fn settlement(&self) -> Settlement {
        self.params.settlement
    }

    #[must_use]
    pub fn expiry(&self) -> u64 {
        self.params.expiry
    }

    #[must_use]
    pub fn tokens(&self) -> u64 {
        self.params.tokens
    }

    #[must_use]
    pub fn price(&self) -> CoExp {
        self.params.price
    }

    #[must_use]
    pub fn volume(&self) -> CoExp {
        self.params.volume
    }

    #[must_use]
    pub fn minimum_volume(&self) -> CoExp {
        self.params.minimum_volume
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.params.nonce
    }

    #[must_use]
    pub fn signature(&self) -> Option<&[u8]> {
        self.params.signature.as_deref()
    }

    /// Fields of this order, with the derived id filled in
    #[must_use]
    pub fn to_params(&self) -> OrderParams {
        OrderParams {
            id: Some(self.id),
            ..self.params.clone()
        }
    }
}
