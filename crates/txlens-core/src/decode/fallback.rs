use bitcoin::{TxIn, TxOut};

use super::reader::{ParseError, Reader};
use super::zcash::{split_header, SAPLING_VERSION};
use super::ParsedTx;
use crate::types::ShieldedSummary;

/// Minimal transparent-only reader: version (plus the version group id of
/// overwintered headers), inputs, outputs and lock time. Whatever follows
/// is shielded-pool data that value/address extraction does not need, so
/// it is left unread. Overwintered versions past Sapling move fields ahead
/// of the inputs and are rejected.
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

    tracing::debug!(
        ignored_bytes = reader.remaining(),
        "transparent reader stopped after lock time"
    );

    Ok(ParsedTx {
        version,
        overwintered,
        lock_time,
        inputs,
        outputs,
        shielded: ShieldedSummary::default(),
        native_txid: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{truncated_sapling_tx_hex, v5_tx_hex};
    use bitcoin::hex::FromHex;

    #[test]
    fn ignores_unparseable_shielded_tail() {
        let bytes = Vec::<u8>::from_hex(&truncated_sapling_tx_hex()).expect("valid hex");
        let parsed = parse(&bytes).expect("transparent part must parse");
        assert!(parsed.overwintered);
        assert_eq!(parsed.version, 4);
        assert_eq!(parsed.inputs.len(), 1);
        assert_eq!(parsed.outputs[0].value.to_sat(), 100_000);
        assert!(parsed.native_txid.is_none());
    }

    #[test]
    fn rejects_overwintered_version_five() {
        let bytes = Vec::<u8>::from_hex(&v5_tx_hex()).expect("valid hex");
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(5)));
    }

    #[test]
    fn fails_when_outputs_are_cut_short() {
        // Header, no inputs, one output announced but only two value bytes.
        let bytes = Vec::<u8>::from_hex("01000000000101ff").expect("valid hex");
        assert!(parse(&bytes).is_err());
    }
}
