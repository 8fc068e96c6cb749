//! Domain types for the decode → resolve → classify pipeline.
//!
//! Contains the decoded transaction structure (`DecodedTransaction`,
//! `RawInput`, `DecodedOutput`), the resolved view handed to the classifier
//! (`ResolvedInput`, `ResolvedTransaction`), and the externally visible
//! classification result (`ClassificationRecord`, `Classification`).

use bitcoin::hashes::Hash;
use bitcoin::{Amount, ScriptBuf, SignedAmount, Txid};
use serde::Serialize;

const SATS_PER_COIN: u64 = 100_000_000;

/// Render a satoshi amount as a fixed 8-decimal coin string.
#[must_use]
pub fn format_coins(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_COIN, sats % SATS_PER_COIN)
}

// ==============================================================================
// Script Classification
// ==============================================================================

/// The locking-script kinds the classifier distinguishes. Everything that is
/// not one of the three legacy address-bearing templates is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    PubKeyHash,
    PubKey,
    ScriptHash,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptInfo {
    pub asm: String,
    pub hex: String,
    pub kind: ScriptKind,
    /// Destination addresses implied by `kind`. Empty for `Other`.
    pub addresses: Vec<String>,
}

impl ScriptInfo {
    pub fn pays_to(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

// ==============================================================================
// Decoded Transaction
// ==============================================================================

/// A transaction input as it appears on the wire. Carries no value or
/// address until resolved against its parent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawInput {
    pub previous_txid: Txid,
    pub previous_output_index: u32,
    pub script: ScriptBuf,
    pub script_asm: String,
    pub sequence: u32,
}

impl RawInput {
    /// Placeholder standing in for an empty transparent input list.
    pub fn coinbase_sentinel() -> Self {
        Self {
            previous_txid: Txid::all_zeros(),
            previous_output_index: u32::MAX,
            script: ScriptBuf::new(),
            script_asm: String::new(),
            sequence: u32::MAX,
        }
    }

    /// Inputs spending the all-zero txid have no parent to look up.
    pub fn is_coinbase(&self) -> bool {
        self.previous_txid == Txid::all_zeros()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedOutput {
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
    pub value_decimal: String,
    pub index: u32,
    pub script_info: ScriptInfo,
}

impl DecodedOutput {
    pub fn new(value: Amount, index: u32, script_info: ScriptInfo) -> Self {
        Self {
            value,
            value_decimal: format_coins(value.to_sat()),
            index,
            script_info,
        }
    }
}

/// Which decoding strategy produced a `DecodedTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    Primary,
    /// Transparent-only reader; shielded-pool trailing data was ignored.
    Fallback,
}

/// Where a `DecodedTransaction::txid` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    Native,
    Recomputed,
}

/// Counts of shielded-pool components skipped by the primary decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShieldedSummary {
    pub join_splits: usize,
    pub sapling_spends: usize,
    pub sapling_outputs: usize,
}

impl ShieldedSummary {
    pub fn is_empty(&self) -> bool {
        self.join_splits == 0 && self.sapling_spends == 0 && self.sapling_outputs == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTransaction {
    pub txid: Txid,
    pub version: i32,
    pub locktime: u32,
    /// `true` when the Zcash-family overwinter bit was set in the header.
    pub overwintered: bool,
    /// Never empty: a transaction without transparent inputs carries a
    /// single `RawInput::coinbase_sentinel()`.
    pub inputs: Vec<RawInput>,
    pub outputs: Vec<DecodedOutput>,
    pub strategy: DecodeStrategy,
    pub id_source: IdSource,
    pub shielded: ShieldedSummary,
}

// ==============================================================================
// Resolved Transaction
// ==============================================================================

/// An input annotated with the parent output it spends, or `Unresolved`
/// when that output could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedInput {
    Resolved(DecodedOutput),
    Unresolved,
}

impl ResolvedInput {
    pub fn output(&self) -> Option<&DecodedOutput> {
        match self {
            Self::Resolved(output) => Some(output),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxFormat {
    pub txid: Txid,
    pub version: i32,
    pub locktime: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTransaction {
    /// Chain identifier of the network the transaction was decoded with.
    pub coin: String,
    pub format: TxFormat,
    pub inputs: Vec<ResolvedInput>,
    pub outputs: Vec<DecodedOutput>,
    /// Block height; `0` for unconfirmed (mempool) transactions.
    pub height: u64,
    pub timestamp: i64,
    pub confirmations: i64,
}

// ==============================================================================
// Classification
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationType {
    Sent,
    Received,
    #[serde(rename = "self")]
    SelfSend,
    Other,
    Unknown,
}

/// The effect of one transaction on the target address.
///
/// `amount` and `address` are `None` when they cannot be determined
/// (`Other` and `Unknown` records). Amounts serialize as decimal coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    #[serde(with = "bitcoin::amount::serde::as_btc::opt")]
    pub amount: Option<Amount>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "bitcoin::amount::serde::as_btc::opt"
    )]
    pub fee: Option<SignedAmount>,
    /// Claimed reward on reward-bearing chains, surfaced as the negative
    /// difference between inputs and outputs.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "bitcoin::amount::serde::as_btc::opt"
    )]
    pub interest: Option<SignedAmount>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    pub timestamp: i64,
    pub txid: Txid,
    pub confirmations: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locktime: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<RawInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<DecodedOutput>,
}

impl ClassificationRecord {
    /// A record with only the identifying fields set.
    pub fn new(kind: ClassificationType, txid: Txid, timestamp: i64, confirmations: i64) -> Self {
        Self {
            kind,
            amount: None,
            fee: None,
            interest: None,
            address: None,
            from: Vec::new(),
            to: Vec::new(),
            timestamp,
            txid,
            confirmations,
            height: None,
            block_time: None,
            raw_hex: None,
            locktime: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

/// A transaction classifies into either one record or a sent/received pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Classification {
    One(ClassificationRecord),
    Pair(ClassificationRecord, ClassificationRecord),
}

impl Classification {
    pub fn records(&self) -> impl Iterator<Item = &ClassificationRecord> {
        let (first, second) = match self {
            Self::One(record) => (record, None),
            Self::Pair(sent, received) => (sent, Some(received)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ClassificationRecord> {
        let (first, second) = match self {
            Self::One(record) => (record, None),
            Self::Pair(sent, received) => (sent, Some(received)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn into_records(self) -> Vec<ClassificationRecord> {
        match self {
            Self::One(record) => vec![record],
            Self::Pair(sent, received) => vec![sent, received],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::txid_from_byte;

    #[test]
    fn format_coins_pads_to_eight_decimals() {
        assert_eq!(format_coins(0), "0.00000000");
        assert_eq!(format_coins(1), "0.00000001");
        assert_eq!(format_coins(199_999_000), "1.99999000");
        assert_eq!(format_coins(5_000_000_000), "50.00000000");
    }

    #[test]
    fn coinbase_sentinel_uses_all_zero_txid() {
        let sentinel = RawInput::coinbase_sentinel();
        assert!(sentinel.is_coinbase());
        assert_eq!(sentinel.previous_txid.to_string(), "0".repeat(64));
    }

    #[test]
    fn spending_input_is_not_coinbase() {
        let input = RawInput {
            previous_txid: txid_from_byte(7),
            previous_output_index: 0,
            script: ScriptBuf::new(),
            script_asm: String::new(),
            sequence: u32::MAX,
        };
        assert!(!input.is_coinbase());
    }

    #[test]
    fn records_iterates_pair_in_order() {
        let txid = txid_from_byte(1);
        let classification = Classification::Pair(
            ClassificationRecord::new(ClassificationType::Sent, txid, 0, 0),
            ClassificationRecord::new(ClassificationType::Received, txid, 0, 0),
        );
        let kinds: Vec<_> = classification.records().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![ClassificationType::Sent, ClassificationType::Received]
        );
    }

    #[test]
    fn self_send_serializes_as_self() {
        let json = serde_json::to_value(ClassificationType::SelfSend).expect("serialize");
        assert_eq!(json, serde_json::json!("self"));
    }

    #[test]
    fn unknown_amount_serializes_as_null() {
        let record = ClassificationRecord::new(ClassificationType::Other, txid_from_byte(1), 10, 2);
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json["amount"].is_null());
        assert!(json["address"].is_null());
        assert!(json.get("fee").is_none());
        assert_eq!(json["type"], "other");
    }
}
