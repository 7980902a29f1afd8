//! Confidential order fragmentation for darknode pods
//!
//! An order's price, volume, minimum volume, tokens and nonce are split into
//! Shamir shares, one per darknode in each pod, and every node's shares are
//! encrypted under that node's key. No single darknode learns the order.
//!
//! ```text
//! Order ──► codec::verify_order ──► pods::assign_pods(snapshot)
//!                                        │ per pod
//!                                        ▼
//!                      shamir::split ──► crypto::encrypt ──► OrderFragment
//!                                        │
//!                                        ▼
//!                         FragmentSet (pod id → fragments) ──► ingress
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod commands;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod fragments;
pub mod ingress;
pub mod pods;
pub mod registry;
pub mod shamir;
pub mod wasm;

pub use error::{FragmentError, Result};
