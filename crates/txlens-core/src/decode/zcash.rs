//! Structural parser for Zcash-family transactions (Sprout, Overwinter and
//! Sapling layouts). Shielded-pool components are skipped by their fixed
//! sizes and only counted.

use bitcoin::{TxIn, TxOut};

use super::reader::{ParseError, Reader};
use super::{legacy_txid, ParsedTx};
use crate::types::ShieldedSummary;

const OVERWINTER_FLAG: u32 = 1 << 31;

/// First version carrying a join-split vector.
const SPROUT_VERSION: i32 = 2;
/// First (and last supported) overwintered version with Sapling fields.
pub(super) const SAPLING_VERSION: i32 = 4;

// cv + anchor + nullifier + rk + zkproof + spendAuthSig
const SAPLING_SPEND_LEN: u64 = 32 + 32 + 32 + 32 + 192 + 64;
// cv + cmu + ephemeralKey + encCiphertext + outCiphertext + zkproof
const SAPLING_OUTPUT_LEN: u64 = 32 + 32 + 32 + 580 + 80 + 192;
// Join-split description with a PHGR13 proof (296 bytes) or, from
// Sapling on, a Groth16 proof (192 bytes).
const JOIN_SPLIT_PHGR_LEN: u64 = 8 + 8 + 32 + 64 + 64 + 32 + 32 + 64 + 296 + 2 * 601;
const JOIN_SPLIT_GROTH_LEN: u64 = JOIN_SPLIT_PHGR_LEN - 296 + 192;
const JOIN_SPLIT_PUBKEY_LEN: u64 = 32;
const JOIN_SPLIT_SIG_LEN: u64 = 64;
const BINDING_SIG_LEN: u64 = 64;

/// Split a raw header into `(overwintered, version)`.
pub(super) fn split_header(header: u32) -> (bool, i32) {
    let overwintered = header & OVERWINTER_FLAG != 0;
    (overwintered, (header & !OVERWINTER_FLAG) as i32)
}

/// Parse a complete Zcash-family transaction. Every byte must be consumed.
pub(super) fn parse(bytes: &[u8]) -> Result<ParsedTx, ParseError> {
    let mut reader = Reader::new(bytes);

    let (overwintered, version) = split_header(reader.read("header")?);
    if overwintered {
        if version > SAPLING_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }
        reader.skip(4, "version group id")?;
    }

    let inputs: Vec<TxIn> = reader.read("inputs")?;
    let outputs: Vec<TxOut> = reader.read("outputs")?;
    let lock_time: u32 = reader.read("lock time")?;

    let sapling = overwintered && version >= SAPLING_VERSION;
    let mut shielded = ShieldedSummary::default();

    if overwintered {
        reader.skip(4, "expiry height")?;
    }
    if sapling {
        reader.skip(8, "value balance")?;
        shielded.sapling_spends = reader.skip_vec(SAPLING_SPEND_LEN, "sapling spends")?;
        shielded.sapling_outputs = reader.skip_vec(SAPLING_OUTPUT_LEN, "sapling outputs")?;
    }
    if version >= SPROUT_VERSION {
        let join_split_len = if sapling {
            JOIN_SPLIT_GROTH_LEN
        } else {
            JOIN_SPLIT_PHGR_LEN
        };
        shielded.join_splits = reader.skip_vec(join_split_len, "join splits")?;
        if shielded.join_splits > 0 {
            reader.skip(JOIN_SPLIT_PUBKEY_LEN, "join split public key")?;
            reader.skip(JOIN_SPLIT_SIG_LEN, "join split signature")?;
        }
    }
    if sapling && shielded.sapling_spends + shielded.sapling_outputs > 0 {
        reader.skip(BINDING_SIG_LEN, "binding signature")?;
    }
    reader.finish()?;

    // Only version-1 transactions share the Bitcoin legacy layout; every
    // later layout hashes fields the transparent model does not keep.
    let native_txid = (!overwintered && version < SPROUT_VERSION)
        .then(|| legacy_txid(version, lock_time, &inputs, &outputs));

    Ok(ParsedTx {
        version,
        overwintered,
        lock_time,
        inputs,
        outputs,
        shielded,
        native_txid,
    })
}
