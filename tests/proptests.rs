//! Property-based tests for fragmenter
//!
//! This test suite uses quickcheck to verify correctness across random inputs,
//! including random secrets, split parameters, registries and orders.
//!
//! Run with: cargo test --test proptests

#[path = "proptests/shamir.rs"]
mod shamir;

#[path = "proptests/pods.rs"]
mod pods;

#[path = "proptests/codec.rs"]
mod codec;
