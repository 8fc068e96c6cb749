//! Classification of a resolved transaction relative to one target address.
//!
//! Each side (inputs, outputs) is tallied into a total, the portion paid
//! from/to the target, and the distinct addresses seen. The combination of
//! the two attributed amounts selects the record shape.

use bitcoin::{Amount, SignedAmount, Txid};

use crate::network::is_reward_bearing_coin;
use crate::types::{
    Classification, ClassificationRecord, ClassificationType, DecodedOutput, ResolvedTransaction,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Leave the target out of the distinct address lists, hiding change
    /// paid back to it.
    pub skip_target_self_pairing: bool,
}

/// Accumulators for one side of a transaction. Local to a single call.
#[derive(Debug, Default)]
struct SideTally {
    total: Amount,
    attributed: Amount,
    /// First address of every addressed entry, de-duplicated in
    /// first-seen order.
    distinct: Vec<String>,
}

impl SideTally {
    fn tally<'a>(
        outputs: impl IntoIterator<Item = &'a DecodedOutput>,
        target: &str,
        options: ClassifyOptions,
    ) -> Self {
        let mut side = Self::default();
        for output in outputs {
            side.total = side.total.checked_add(output.value).unwrap_or(Amount::MAX);
            if output.script_info.pays_to(target) {
                side.attributed = side
                    .attributed
                    .checked_add(output.value)
                    .unwrap_or(Amount::MAX);
            }

            let Some(address) = output.script_info.addresses.first() else {
                continue;
            };
            if options.skip_target_self_pairing && address == target {
                continue;
            }
            if !side.distinct.contains(address) {
                side.distinct.push(address.clone());
            }
        }
        side
    }

    fn is_only(&self, target: &str) -> bool {
        matches!(self.distinct.as_slice(), [only] if only == target)
    }
}

/// `a - b` as a signed amount, clamped to the representable range.
fn signed_difference(a: Amount, b: Amount) -> SignedAmount {
    let diff = i128::from(a.to_sat()) - i128::from(b.to_sat());
    let clamped = diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    SignedAmount::from_sat(clamped as i64)
}

/// Classify `tx` from the point of view of `target`.
pub fn classify_transaction(
    tx: &ResolvedTransaction,
    target: &str,
    options: ClassifyOptions,
) -> Classification {
    let inputs = SideTally::tally(
        tx.inputs.iter().filter_map(|input| input.output()),
        target,
        options,
    );
    let outputs = SideTally::tally(&tx.outputs, target, options);

    let difference = signed_difference(inputs.total, outputs.total);
    let interest = (is_reward_bearing_coin(&tx.coin) && difference.is_negative())
        .then_some(difference);
    let both_self = inputs.is_only(target) && outputs.is_only(target);

    let record = |kind| {
        ClassificationRecord::new(kind, tx.format.txid, tx.timestamp, tx.confirmations)
    };
    let with_parties = |mut record: ClassificationRecord| {
        record.from = inputs.distinct.clone();
        record.to = outputs.distinct.clone();
        record
    };

    let classification = match (inputs.attributed > Amount::ZERO, outputs.attributed > Amount::ZERO) {
        (true, true) if both_self => {
            let mut own = record(ClassificationType::SelfSend);
            own.amount = Some(
                inputs
                    .total
                    .checked_sub(outputs.total)
                    .unwrap_or(Amount::ZERO),
            );
            own.fee = Some(difference);
            own.interest = interest;
            own.address = Some(target.to_owned());
            Classification::One(own)
        }
        (true, true) => {
            let mut sent = with_parties(record(ClassificationType::Sent));
            sent.amount = Some(inputs.attributed);
            sent.fee = Some(difference);
            sent.address = outputs.distinct.first().cloned();

            let mut received = with_parties(record(ClassificationType::Received));
            received.amount = Some(outputs.attributed);
            received.address = Some(target.to_owned());
            received.interest = interest;

            Classification::Pair(sent, received)
        }
        (false, true) => {
            let mut received = with_parties(record(ClassificationType::Received));
            received.amount = Some(outputs.attributed);
            received.address = Some(target.to_owned());
            Classification::One(received)
        }
        (true, false) => {
            let mut sent = with_parties(record(ClassificationType::Sent));
            sent.amount = Some(inputs.attributed);
            sent.fee = Some(difference);
            sent.address = if both_self {
                Some(target.to_owned())
            } else {
                outputs.distinct.first().cloned()
            };
            Classification::One(sent)
        }
        (false, false) => Classification::One(record(ClassificationType::Other)),
    };

    tracing::debug!(
        txid = %tx.format.txid,
        records = classification.records().count(),
        "transaction classified"
    );
    classification
}

/// Record for a transaction whose bytes could not be decoded at all.
#[must_use]
pub fn undecodable(txid: Txid, timestamp: i64, confirmations: i64) -> Classification {
    Classification::One(ClassificationRecord::new(
        ClassificationType::Unknown,
        txid,
        timestamp,
        confirmations,
    ))
}
