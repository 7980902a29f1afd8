//! Canonical byte layouts and the identifiers hashed from them
//!
//! # Order layout
//!
//! All integers unsigned big-endian:
//!
//! ```text
//! type(1) ‖ parity(1) ‖ settlement(4) ‖ expiry(8) ‖ tokens(8)
//!   ‖ price.co(8) ‖ price.exp(8) ‖ volume.co(8) ‖ volume.exp(8)
//!   ‖ minimumVolume.co(8) ‖ minimumVolume.exp(8) ‖ keccak256(nonce(8))
//! ```
//!
//! The order id is the Keccak-256 digest of those 102 bytes.
//!
//! # Fragment layout (version 1)
//!
//! ```text
//! version(1) ‖ orderId(32) ‖ type(1) ‖ parity(1) ‖ settlement(4) ‖ expiry(8)
//!   ‖ index(8) ‖ { len(4) ‖ ciphertext } × 8 ‖ len(4) ‖ orderSignature
//! ```
//!
//! Ciphertexts appear in the order tokens, price.co, price.exp, volume.co,
//! volume.exp, minimumVolume.co, minimumVolume.exp, nonce. A missing
//! signature is encoded as length zero.

use sha3::{Digest, Keccak256};

use crate::domain::{Address, CoExp, Hash32, Order, OrderFragment, OrderParams};
use crate::error::{FragmentError, Result};
use crate::shamir::PRIME;

/// Largest permitted price mantissa
pub const PRICE_CO_MAX: u64 = 1999;

/// Largest permitted volume and minimum volume mantissa
pub const VOLUME_CO_MAX: u64 = 49;

/// Largest permitted exponent for any quantity
pub const EXP_MAX: u64 = 52;

/// Version byte leading every fragment id preimage
pub const FRAGMENT_LAYOUT_VERSION: u8 = 1;

/// Length of an encoded order
pub const ORDER_ENCODED_LEN: usize = 1 + 1 + 4 + 8 + 8 + 6 * 8 + 32;

/// Keccak-256 digest of `data`
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash32 {
    Hash32::new(Keccak256::digest(data).into())
}

/// Fixed-layout encoding of an order, the preimage of its id
#[must_use]
pub fn encode_order(order: &Order) -> Vec<u8> {
    encode_params(&order.to_params())
}

/// Derived id of an order
#[must_use]
pub fn order_id(order: &Order) -> Hash32 {
    keccak256(&encode_order(order))
}

fn encode_params(params: &OrderParams) -> Vec<u8> {
    let mut out = Vec::with_capacity(ORDER_ENCODED_LEN);
    out.push(params.order_type.to_u8());
    out.push(params.parity.to_u8());
    out.extend_from_slice(&params.settlement.to_u32().to_be_bytes());
    out.extend_from_slice(&params.expiry.to_be_bytes());
    out.extend_from_slice(&params.tokens.to_be_bytes());
    for quantity in [params.price, params.volume, params.minimum_volume] {
        out.extend_from_slice(&quantity.co.to_be_bytes());
        out.extend_from_slice(&quantity.exp.to_be_bytes());
    }
    out.extend_from_slice(keccak256(&params.nonce.to_be_bytes()).as_bytes());
    out
}

fn check_bounds(name: &str, value: CoExp, co_max: u64) -> Result<()> {
    if value.co > co_max {
        return Err(FragmentError::InvalidOrderFields(format!(
            "{name} mantissa {} exceeds {co_max}",
            value.co
        )));
    }
    if value.exp > EXP_MAX {
        return Err(FragmentError::InvalidOrderFields(format!(
            "{name} exponent {} exceeds {EXP_MAX}",
            value.exp
        )));
    }
    Ok(())
}

/// Checks field bounds and returns the derived order id
///
/// Nothing is hashed until every bound holds. A claimed `id` must match the
/// derived one.
///
/// # Errors
/// Returns [`FragmentError::InvalidOrderFields`] on any violation
pub fn verify_order(params: &OrderParams) -> Result<Hash32> {
    check_bounds("price", params.price, PRICE_CO_MAX)?;
    check_bounds("volume", params.volume, VOLUME_CO_MAX)?;
    check_bounds("minimum volume", params.minimum_volume, VOLUME_CO_MAX)?;
    for (name, value) in [("tokens", params.tokens), ("nonce", params.nonce)] {
        if value >= PRIME {
            return Err(FragmentError::InvalidOrderFields(format!(
                "{name} {value} is not below the field prime"
            )));
        }
    }

    let id = keccak256(&encode_params(params));
    match params.id {
        Some(claimed) if claimed != id => Err(FragmentError::InvalidOrderFields(format!(
            "order id {claimed} does not match derived id {id}"
        ))),
        _ => Ok(id),
    }
}

fn push_prefixed(out: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        FragmentError::EncodingError(format!("field of {} bytes is too long", bytes.len()))
    })?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Versioned fixed-layout encoding of a fragment, the preimage of its id
///
/// # Errors
/// Returns [`FragmentError::EncodingError`] if a field exceeds `u32::MAX` bytes
pub fn encode_fragment(fragment: &OrderFragment) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64 + 8 * 132);
    out.push(FRAGMENT_LAYOUT_VERSION);
    out.extend_from_slice(fragment.order_id().as_bytes());
    out.push(fragment.order_type().to_u8());
    out.push(fragment.order_parity().to_u8());
    out.extend_from_slice(&fragment.order_settlement().to_u32().to_be_bytes());
    out.extend_from_slice(&fragment.order_expiry().to_be_bytes());
    out.extend_from_slice(&(*fragment.index()).to_be_bytes());
    for ciphertext in fragment.ciphertexts() {
        push_prefixed(&mut out, ciphertext.as_bytes())?;
    }
    push_prefixed(&mut out, fragment.order_signature().unwrap_or_default())?;
    Ok(out)
}

/// Derived id of a fragment
///
/// # Errors
/// See [`encode_fragment`]
pub fn fragment_id(fragment: &OrderFragment) -> Result<Hash32> {
    encode_fragment(fragment).map(|bytes| keccak256(&bytes))
}

/// Pod id: digest of the member addresses concatenated in assignment order
#[must_use]
pub fn pod_id(darknodes: &[Address]) -> Hash32 {
    let mut hasher = Keccak256::new();
    for address in darknodes {
        hasher.update(address.as_bytes());
    }
    Hash32::new(hasher.finalize().into())
}
