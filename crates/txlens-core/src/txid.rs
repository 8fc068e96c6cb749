//! Transaction id recomputation from serialized bytes.
//!
//! Zcash-family transactions hash their full serialization, including the
//! version group id and shielded-pool fields that the `bitcoin` crate's
//! transparent model drops, so their ids are computed here directly.

use bitcoin::hashes::{sha256d, Hash};
use bitcoin::Txid;

/// Double SHA-256 of `bytes`. The returned `Txid` displays in reversed byte
/// order, matching block explorers.
#[must_use]
pub fn recompute_id(bytes: &[u8]) -> Txid {
    Txid::from_raw_hash(sha256d::Hash::hash(bytes))
}
