//! Wire types shared by the executor crates.
//!
//! Every type here mirrors one JSON envelope of the scheduler protocol.
//! Field names on the wire are part of the contract and must not change.

mod domain;
pub use domain::*;
