//! End-to-end formatting of fetched transactions: decode, resolve inputs,
//! classify, and stamp the records with chain position and raw data.

use bitcoin::Txid;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::classify::{classify_transaction, undecodable, ClassifyOptions};
use crate::decode::decode;
use crate::error::CoreError;
use crate::network::NetworkParams;
use crate::resolve::{ensure_parents_available, resolve_inputs, ParentLookup};
use crate::types::{Classification, ResolvedTransaction, TxFormat};

/// Everything already fetched for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBundle {
    pub hex: String,
    /// `parents[i]` is the transaction spent by input `i`.
    #[serde(default)]
    pub parents: Vec<ParentLookup>,
    /// Block height; `0` while unconfirmed.
    #[serde(default)]
    pub height: u64,
    /// Block time in unix seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Id reported by the source the hex was fetched from, if any.
    #[serde(default)]
    pub txid: Option<Txid>,
}

/// `(timestamp, confirmations)` for a transaction at `height`.
///
/// Unconfirmed transactions report zero confirmations and the current time.
pub fn chain_position(height: u64, timestamp: i64, current_height: u64, now: i64) -> (i64, i64) {
    if height == 0 {
        return (now, 0);
    }
    let confirmations = i128::from(current_height) - i128::from(height);
    let confirmations = confirmations.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
    (timestamp, confirmations)
}

pub fn format_transaction(
    bundle: &TxBundle,
    target: &str,
    network: &NetworkParams,
    current_height: u64,
) -> Result<Classification, CoreError> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    format_transaction_at(bundle, target, network, current_height, now)
}

/// [`format_transaction`] with the wall-clock time supplied by the caller.
pub fn format_transaction_at(
    bundle: &TxBundle,
    target: &str,
    network: &NetworkParams,
    current_height: u64,
    now: i64,
) -> Result<Classification, CoreError> {
    // A transaction is never classified against a partial parent set.
    ensure_parents_available(&bundle.parents)?;

    let (timestamp, confirmations) =
        chain_position(bundle.height, bundle.timestamp, current_height, now);

    let tx = match decode(&bundle.hex, network) {
        Ok(tx) => tx,
        Err(err) => {
            let Some(txid) = bundle.txid else {
                return Err(err);
            };
            tracing::warn!(%txid, error = %err, "transaction undecodable, reporting as unknown");
            return Ok(undecodable(txid, timestamp, confirmations));
        }
    };

    if let Some(expected) = bundle.txid.filter(|expected| *expected != tx.txid) {
        tracing::warn!(%expected, decoded = %tx.txid, "decoded id differs from reported id");
    }

    let resolved = ResolvedTransaction {
        coin: network.coin.clone(),
        format: TxFormat {
            txid: tx.txid,
            version: tx.version,
            locktime: tx.locktime,
        },
        inputs: resolve_inputs(&tx.inputs, &bundle.parents, network)?,
        outputs: tx.outputs.clone(),
        height: bundle.height,
        timestamp,
        confirmations,
    };

    let mut classification = classify_transaction(&resolved, target, ClassifyOptions::default());
    for record in classification.records_mut() {
        record.height = Some(bundle.height);
        record.block_time = Some(bundle.timestamp);
        record.raw_hex = Some(bundle.hex.trim().to_owned());
        record.locktime = Some(tx.locktime);
        record.inputs = tx.inputs.clone();
        record.outputs = tx.outputs.clone();
    }
    Ok(classification)
}

/// Format each bundle independently. A failure is reported in place and
/// does not affect the other bundles.
pub fn format_batch(
    bundles: &[TxBundle],
    target: &str,
    network: &NetworkParams,
    current_height: u64,
) -> Vec<Result<Classification, CoreError>> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    bundles
        .iter()
        .enumerate()
        .map(|(position, bundle)| {
            let result = format_transaction_at(bundle, target, network, current_height, now);
            if let Err(err) = &result {
                tracing::warn!(position, error = %err, "skipping transaction");
            }
            result
        })
        .collect()
}
