//! Raw transaction decoding.
//!
//! Two strategies are tried in order:
//!
//! - **Primary**: full structural parse. Non-shielded networks use the
//!   `bitcoin` crate's consensus decoder (segwit aware); shielded-capable
//!   networks use the Zcash-family layout parser in [`zcash`]. Both require
//!   every byte to be consumed.
//! - **Fallback**: shielded-capable networks only. Reads the transparent
//!   part and ignores whatever follows the lock time.
//!
//! When the native id of the parsed structure cannot be trusted, the id is
//! recomputed from the raw bytes with [`crate::txid::recompute_id`].

mod fallback;
mod reader;
mod zcash;

use bitcoin::hex::FromHex;
use bitcoin::{absolute, transaction, Transaction, TxIn, TxOut, Txid};

use crate::error::CoreError;
use crate::network::NetworkParams;
use crate::script::classify_output_script;
use crate::txid::recompute_id;
use crate::types::{
    DecodeStrategy, DecodedOutput, DecodedTransaction, IdSource, RawInput, ShieldedSummary,
};
use reader::ParseError;

/// Transparent view produced by either strategy, before address rendering.
#[derive(Debug)]
pub(crate) struct ParsedTx {
    pub(crate) version: i32,
    pub(crate) overwintered: bool,
    pub(crate) lock_time: u32,
    pub(crate) inputs: Vec<TxIn>,
    pub(crate) outputs: Vec<TxOut>,
    pub(crate) shielded: ShieldedSummary,
    /// Id computed from the parsed structure, when that structure covers
    /// every serialized byte.
    pub(crate) native_txid: Option<Txid>,
}

/// Txid of a transaction serialized in the Bitcoin legacy layout.
pub(super) fn legacy_txid(version: i32, lock_time: u32, inputs: &[TxIn], outputs: &[TxOut]) -> Txid {
    Transaction {
        version: transaction::Version(version),
        lock_time: absolute::LockTime::from_consensus(lock_time),
        input: inputs.to_vec(),
        output: outputs.to_vec(),
    }
    .compute_txid()
}

/// Decode a hex-encoded transaction. Surrounding whitespace is ignored.
pub fn decode(raw_hex: &str, network: &NetworkParams) -> Result<DecodedTransaction, CoreError> {
    let bytes =
        Vec::<u8>::from_hex(raw_hex.trim()).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
    decode_bytes(&bytes, network)
}

/// Decode serialized transaction bytes.
pub fn decode_bytes(bytes: &[u8], network: &NetworkParams) -> Result<DecodedTransaction, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Decode("empty transaction".into()));
    }

    let primary = if network.shielded_capable {
        zcash::parse(bytes)
    } else {
        parse_bitcoin(bytes)
    };

    match primary {
        Ok(parsed) => {
            tracing::debug!(
                coin = %network.coin,
                version = parsed.version,
                overwintered = parsed.overwintered,
                "decoded with primary strategy"
            );
            Ok(build(bytes, parsed, DecodeStrategy::Primary, network))
        }
        Err(primary_err) if network.shielded_capable => {
            tracing::warn!(
                coin = %network.coin,
                error = %primary_err,
                "primary decode failed, falling back to transparent-only reader"
            );
            let parsed = fallback::parse(bytes).map_err(|fallback_err| {
                CoreError::Decode(format!(
                    "primary: {primary_err}; fallback: {fallback_err}"
                ))
            })?;
            Ok(build(bytes, parsed, DecodeStrategy::Fallback, network))
        }
        Err(primary_err) => Err(CoreError::Decode(primary_err.to_string())),
    }
}

fn parse_bitcoin(bytes: &[u8]) -> Result<ParsedTx, ParseError> {
    let tx: Transaction = bitcoin::consensus::deserialize(bytes).map_err(|source| {
        ParseError::Field {
            field: "transaction",
            source,
        }
    })?;
    let native_txid = Some(tx.compute_txid());
    Ok(ParsedTx {
        version: tx.version.0,
        overwintered: false,
        lock_time: tx.lock_time.to_consensus_u32(),
        inputs: tx.input,
        outputs: tx.output,
        shielded: ShieldedSummary::default(),
        native_txid,
    })
}

fn build(
    bytes: &[u8],
    parsed: ParsedTx,
    strategy: DecodeStrategy,
    network: &NetworkParams,
) -> DecodedTransaction {
    let (txid, id_source) = match parsed.native_txid {
        Some(txid) => (txid, IdSource::Native),
        None => (recompute_id(bytes), IdSource::Recomputed),
    };

    let mut inputs: Vec<RawInput> = parsed
        .inputs
        .into_iter()
        .map(|txin| RawInput {
            previous_txid: txin.previous_output.txid,
            previous_output_index: txin.previous_output.vout,
            script_asm: txin.script_sig.to_asm_string(),
            script: txin.script_sig,
            sequence: txin.sequence.0,
        })
        .collect();
    if inputs.is_empty() {
        inputs.push(RawInput::coinbase_sentinel());
    }

    let outputs = (0u32..)
        .zip(parsed.outputs)
        .map(|(index, txout)| {
            let script_info = classify_output_script(&txout.script_pubkey, network);
            DecodedOutput::new(txout.value, index, script_info)
        })
        .collect();

    tracing::debug!(%txid, ?strategy, ?id_source, "transaction decoded");

    DecodedTransaction {
        txid,
        version: parsed.version,
        locktime: parsed.lock_time,
        overwintered: parsed.overwintered,
        inputs,
        outputs,
        strategy,
        id_source,
        shielded: parsed.shielded,
    }
}
