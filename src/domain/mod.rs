//! Domain types for order fragmentation
//!
//! Validated newtypes and immutable value objects:
//! - [`Address`] - 20-byte darknode / trader address
//! - [`Hash32`] - 256-bit digest used for order, fragment and pod ids
//! - [`Order`] / [`OrderParams`] - a confidential order and its unchecked input
//! - [`OrderFragment`] - one darknode's encrypted view of an order
//! - [`Pool`] - a pod of darknodes with its derived id
//! - [`Threshold`], [`ShareIndex`], [`ShareCount`], [`SplitConfig`] - secret sharing parameters

mod address;
mod config;
mod fragment;
mod hash;
mod order;
mod pool;
mod share_count;
mod share_index;
mod threshold;

pub use address::Address;
pub use config::SplitConfig;
pub use fragment::{EncryptedCoExp, OrderFragment};
pub use hash::Hash32;
pub use order::{CoExp, Order, OrderParams, OrderType, Parity, Settlement};
pub use pool::Pool;
pub use share_count::ShareCount;
pub use share_index::ShareIndex;
pub use threshold::Threshold;
