//! Output script classification and address derivation.

use bitcoin::hex::DisplayHex;
use bitcoin::Script;

use crate::network::NetworkParams;
use crate::types::{ScriptInfo, ScriptKind};

/// Classify a locking script. Template detection is delegated to the
/// `bitcoin` crate's `is_p2pkh()`, `is_p2pk()` and `is_p2sh()` checks.
#[must_use]
pub fn classify_script_kind(script: &Script) -> ScriptKind {
    if script.is_p2pkh() {
        ScriptKind::PubKeyHash
    } else if script.is_p2pk() {
        ScriptKind::PubKey
    } else if script.is_p2sh() {
        ScriptKind::ScriptHash
    } else {
        ScriptKind::Other
    }
}

/// Render `script` and derive the destination address its kind implies,
/// using the address prefixes of `network`.
#[must_use]
pub fn classify_output_script(script: &Script, network: &NetworkParams) -> ScriptInfo {
    let kind = classify_script_kind(script);
    let bytes = script.as_bytes();

    let address = match kind {
        // OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
        ScriptKind::PubKeyHash => embedded_hash(bytes, 3).map(|h| network.p2pkh_address(&h)),
        // OP_HASH160 <20> OP_EQUAL
        ScriptKind::ScriptHash => embedded_hash(bytes, 2).map(|h| network.p2sh_address(&h)),
        // <pubkey> OP_CHECKSIG
        ScriptKind::PubKey => bytes
            .get(1..bytes.len().saturating_sub(1))
            .map(|key| network.pubkey_address(key)),
        ScriptKind::Other => None,
    };

    ScriptInfo {
        asm: script.to_asm_string(),
        hex: bytes.to_lower_hex_string(),
        kind,
        addresses: address.into_iter().collect(),
    }
}

fn embedded_hash(bytes: &[u8], offset: usize) -> Option<[u8; 20]> {
    bytes.get(offset..offset + 20)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{p2pkh_script, p2sh_script, GENESIS_PUBKEY_HEX};
    use bitcoin::hex::FromHex;
    use bitcoin::ScriptBuf;

    #[test]
    fn p2pkh_derives_network_address() {
        let script = p2pkh_script(0x22);
        let info = classify_output_script(&script, &NetworkParams::komodo());
        assert_eq!(info.kind, ScriptKind::PubKeyHash);
        assert_eq!(info.addresses, vec!["RCPfwfTXRrCVFCT9GmAS2YJSafhC2XqEbD"]);
        assert!(info.asm.starts_with("OP_DUP OP_HASH160"));
        assert_eq!(info.hex, format!("76a914{}88ac", "22".repeat(20)));
    }

    #[test]
    fn p2sh_uses_script_hash_prefix() {
        let script = p2sh_script(0x33);
        let info = classify_output_script(&script, &NetworkParams::bitcoin());
        assert_eq!(info.kind, ScriptKind::ScriptHash);
        assert_eq!(info.addresses, vec!["36MjimMJHwQkrTKrKyw4KepHsd975kSGTs"]);
    }

    #[test]
    fn p2pk_address_from_embedded_key() {
        let mut bytes = vec![0x41];
        bytes.extend(Vec::<u8>::from_hex(GENESIS_PUBKEY_HEX).expect("valid hex"));
        bytes.push(0xac);
        let script = ScriptBuf::from_bytes(bytes);

        let info = classify_output_script(&script, &NetworkParams::bitcoin());
        assert_eq!(info.kind, ScriptKind::PubKey);
        assert_eq!(info.addresses, vec!["1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"]);
    }

    #[test]
    fn op_return_has_no_address() {
        let script = ScriptBuf::from_bytes(vec![0x6a, 0x04, 0xde, 0xad, 0xbe, 0xef]);
        let info = classify_output_script(&script, &NetworkParams::bitcoin());
        assert_eq!(info.kind, ScriptKind::Other);
        assert!(info.addresses.is_empty());
        assert_eq!(info.hex, "6a04deadbeef");
    }

    #[test]
    fn segwit_program_is_other() {
        let mut bytes = vec![0x00, 0x14];
        bytes.extend_from_slice(&[0x01; 20]);
        let script = ScriptBuf::from_bytes(bytes);
        assert_eq!(classify_script_kind(&script), ScriptKind::Other);
    }

    #[test]
    fn empty_script_is_other() {
        let info = classify_output_script(&ScriptBuf::new(), &NetworkParams::bitcoin());
        assert_eq!(info.kind, ScriptKind::Other);
        assert!(info.addresses.is_empty());
        assert_eq!(info.hex, "");
    }
}
