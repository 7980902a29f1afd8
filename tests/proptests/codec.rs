//! Property tests for order encoding and validation

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use fragmenter::codec::{self, EXP_MAX, PRICE_CO_MAX, VOLUME_CO_MAX};
use fragmenter::domain::{CoExp, Order, OrderParams, OrderType, Parity, Settlement};
use fragmenter::shamir::PRIME;

/// Wrapper for order parameters with fields near (and past) their bounds
#[derive(Clone, Debug)]
struct NearBoundsOrder(OrderParams);

fn near(g: &mut Gen, max: u64) -> u64 {
    u64::arbitrary(g) % (max + 3)
}

impl Arbitrary for NearBoundsOrder {
    fn arbitrary(g: &mut Gen) -> Self {
        NearBoundsOrder(OrderParams {
            order_type: if bool::arbitrary(g) { OrderType::Limit } else { OrderType::Midpoint },
            parity: if bool::arbitrary(g) { Parity::Buy } else { Parity::Sell },
            settlement: if bool::arbitrary(g) { Settlement::RenEx } else { Settlement::RenExAtomic },
            expiry: u64::arbitrary(g),
            tokens: u64::arbitrary(g) % PRIME,
            price: CoExp::new(near(g, PRICE_CO_MAX), near(g, EXP_MAX)),
            volume: CoExp::new(near(g, VOLUME_CO_MAX), near(g, EXP_MAX)),
            minimum_volume: CoExp::new(near(g, VOLUME_CO_MAX), near(g, EXP_MAX)),
            nonce: u64::arbitrary(g) % PRIME,
            signature: None,
            id: None,
        })
    }
}

fn within_bounds(p: &OrderParams) -> bool {
    p.price.co <= PRICE_CO_MAX
        && p.volume.co <= VOLUME_CO_MAX
        && p.minimum_volume.co <= VOLUME_CO_MAX
        && [p.price.exp, p.volume.exp, p.minimum_volume.exp]
            .iter()
            .all(|&e| e <= EXP_MAX)
}

/// Orders are accepted exactly when every quantity is within bounds
#[quickcheck]
fn prop_verify_matches_bounds(order: NearBoundsOrder) -> bool {
    let NearBoundsOrder(params) = order;
    codec::verify_order(&params).is_ok() == within_bounds(&params)
}

/// Encoding is a pure function of the order and always 102 bytes
#[quickcheck]
fn prop_encoding_deterministic(order: NearBoundsOrder) -> bool {
    let NearBoundsOrder(params) = order;
    let Ok(a) = Order::new(params.clone()) else {
        return true;
    };
    let b = Order::new(params).unwrap();
    let bytes = codec::encode_order(&a);
    bytes == codec::encode_order(&b)
        && bytes.len() == codec::ORDER_ENCODED_LEN
        && a.id() == codec::keccak256(&bytes)
}

/// A different nonce always yields a different order id
#[quickcheck]
fn prop_nonce_changes_id(order: NearBoundsOrder, other: u64) -> bool {
    let NearBoundsOrder(params) = order;
    let other = other % PRIME;
    if other == params.nonce {
        return true;
    }
    let Ok(a) = Order::new(params) else {
        return true;
    };
    a.with_nonce(other).is_ok_and(|b| b.id() != a.id())
}
