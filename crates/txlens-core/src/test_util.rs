//! Shared test helpers for `txlens-core` unit tests.
//!
//! Known transaction vectors (Bitcoin and Zcash genesis coinbases,
//! synthetic Sprout, Overwinter and Sapling transactions), script builders, and constructors for the
//! resolved view handed to the classifier.

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::hashes::Hash;
use bitcoin::{
    absolute, transaction, Amount, OutPoint, PubkeyHash, ScriptBuf, ScriptHash, Sequence,
    Transaction, TxIn, TxOut, Txid, Witness,
};

use crate::types::{
    DecodedOutput, RawInput, ResolvedInput, ResolvedTransaction, ScriptInfo, ScriptKind, TxFormat,
};

// ==============================================================================
// Txid and Script Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// P2PKH script whose 20-byte hash is `b` repeated.
pub fn p2pkh_script(b: u8) -> ScriptBuf {
    ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([b; 20]))
}

/// P2SH script whose 20-byte hash is `b` repeated.
pub fn p2sh_script(b: u8) -> ScriptBuf {
    ScriptBuf::new_p2sh(&ScriptHash::from_byte_array([b; 20]))
}

// ==============================================================================
// Known Vectors
// ==============================================================================

pub const GENESIS_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";
pub const GENESIS_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
pub const GENESIS_PUBKEY_HEX: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

/// Zcash mainnet genesis coinbase; its id is the genesis block's merkle root.
pub const ZCASH_GENESIS_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff071f0104455a6361736830623963346565663862376363343137656535303031653335303039383462366665613335363833613763616331343161303433633432303634383335643334ffffffff010000000000000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";
pub const ZCASH_GENESIS_TXID: &str =
    "c4eaa58879081de3c24a7b117ed2b28300e7ec4c4c1dff1d3f1268b7857a4ddb";

pub const SAPLING_TXID: &str = "a0b33d040392c67462da89effa499345fa91dfb0500b5dd2c365652f8a21448d";
pub const SPROUT_TXID: &str = "7d52cb8c3d8aa56103a21be4d94df9567ddd38a24a4d959ab4cc832abac9dbb3";
pub const TRUNCATED_SAPLING_TXID: &str =
    "a00ee161d1889f0cfb653761ddb833457c6c9583c851281be80347bc6f954562";

/// One input spending `1111..11:0`, empty script, final sequence.
fn zcash_vin() -> String {
    format!("01{}0000000000ffffffff", "11".repeat(32))
}

/// One 0.001 output paying the P2PKH hash `2222..22`.
fn zcash_vout() -> String {
    format!("01a0860100000000001976a914{}88ac", "22".repeat(20))
}

/// Overwintered v4 transaction with one transparent input, one transparent
/// output and one Sapling output (value balance -50000).
pub fn sapling_tx_hex() -> String {
    [
        "0400008085202f89".to_owned(),
        zcash_vin(),
        zcash_vout(),
        "00000000".into(), // lock time
        "00000000".into(), // expiry height
        "b03cffffffffffff".into(), // value balance
        "00".into(), // sapling spends
        "01".into(), // sapling outputs
        "33".repeat(948),
        "00".into(), // join splits
        "44".repeat(64), // binding signature
    ]
    .concat()
}

/// Version 2 transaction with one PHGR13 join-split.
pub fn sprout_tx_hex() -> String {
    [
        "0200000001".to_owned(),
        "55".repeat(32),
        "0100000000feffffff".into(),
        format!("01e8030000000000001976a914{}88ac", "66".repeat(20)),
        "00000000".into(),
        "01".into(),
        "77".repeat(1802),
        "88".repeat(32), // join split public key
        "99".repeat(64), // join split signature
    ]
    .concat()
}

/// Overwintered v3 transaction with one PHGR13 join-split.
pub fn overwinter_tx_hex() -> String {
    [
        "030000807082c403".to_owned(),
        zcash_vin(),
        zcash_vout(),
        "00000000".into(), // lock time
        "40420f00".into(), // expiry height
        "01".into(), // join splits
        "77".repeat(1802),
        "88".repeat(32), // join split public key
        "99".repeat(64), // join split signature
    ]
    .concat()
}

/// Overwintered v4 transaction with one Sapling spend, no Sapling outputs
/// and one Groth16 join-split.
pub fn sapling_spend_tx_hex() -> String {
    [
        "0400008085202f89".to_owned(),
        zcash_vin(),
        zcash_vout(),
        "00000000".into(), // lock time
        "00000000".into(), // expiry height
        "50c3000000000000".into(), // value balance
        "01".into(), // sapling spends
        "aa".repeat(384),
        "00".into(), // sapling outputs
        "01".into(), // join splits
        "bb".repeat(1698),
        "88".repeat(32), // join split public key
        "99".repeat(64), // join split signature
        "44".repeat(64), // binding signature
    ]
    .concat()
}

/// NU5 (v5) header followed by its consensus branch id and opaque data.
pub fn v5_tx_hex() -> String {
    [
        "050000800a27a726".to_owned(),
        "5510e7c8".into(), // consensus branch id
        "00000000".into(), // lock time
        "00000000".into(), // expiry height
        "00".repeat(4000),
    ]
    .concat()
}

/// Sapling-layout transaction whose single Sapling output is cut short.
pub fn truncated_sapling_tx_hex() -> String {
    [
        "0400008085202f89".to_owned(),
        zcash_vin(),
        zcash_vout(),
        "00000000".into(),
        "00000000".into(),
        "0000000000000000".into(),
        "00".into(),
        "01".into(),
        "33".repeat(10),
    ]
    .concat()
}

// ==============================================================================
// Transaction Builders
// ==============================================================================

/// Hex of a version-1 transaction in the Bitcoin legacy layout. `inputs`
/// must not be empty, otherwise the segwit marker is emitted.
pub fn legacy_tx_hex(inputs: &[(Txid, u32)], outputs: &[(u64, ScriptBuf)]) -> String {
    let tx = Transaction {
        version: transaction::Version::ONE,
        lock_time: absolute::LockTime::ZERO,
        input: inputs
            .iter()
            .map(|&(txid, vout)| TxIn {
                previous_output: OutPoint::new(txid, vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect(),
        output: outputs
            .iter()
            .map(|(sats, script)| TxOut {
                value: Amount::from_sat(*sats),
                script_pubkey: script.clone(),
            })
            .collect(),
    };
    serialize_hex(&tx)
}

pub fn raw_input(previous_txid: Txid, previous_output_index: u32) -> RawInput {
    RawInput {
        previous_txid,
        previous_output_index,
        script: ScriptBuf::new(),
        script_asm: String::new(),
        sequence: u32::MAX,
    }
}

/// An output already attributed to `address`, skipping script rendering.
pub fn output_to(address: &str, sats: u64, index: u32) -> DecodedOutput {
    DecodedOutput::new(
        Amount::from_sat(sats),
        index,
        ScriptInfo {
            asm: String::new(),
            hex: String::new(),
            kind: ScriptKind::PubKeyHash,
            addresses: vec![address.to_owned()],
        },
    )
}

/// A confirmed resolved transaction on `coin` with a fixed id and height.
pub fn resolved_tx(
    coin: &str,
    inputs: Vec<ResolvedInput>,
    outputs: Vec<DecodedOutput>,
) -> ResolvedTransaction {
    ResolvedTransaction {
        coin: coin.to_owned(),
        format: TxFormat {
            txid: txid_from_byte(0xab),
            version: 1,
            locktime: 0,
        },
        inputs,
        outputs,
        height: 100,
        timestamp: 1_700_000_000,
        confirmations: 6,
    }
}
