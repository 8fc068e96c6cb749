//! Network parameters: address encoding, shielded-pool capability, and the
//! chain identifier used for chain-specific classification rules.

use bitcoin::hashes::{hash160, Hash};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Chain identifier of the reward-bearing family, whose transactions may
/// claim interest and therefore spend more than their inputs.
const REWARD_BEARING_COIN: &str = "kmd";

/// `true` if `coin` belongs to the reward-bearing family.
pub fn is_reward_bearing_coin(coin: &str) -> bool {
    coin.eq_ignore_ascii_case(REWARD_BEARING_COIN)
}

// ==============================================================================
// Network Parameters
// ==============================================================================

/// Immutable description of a chain, supplied by the caller.
///
/// Address prefixes are the raw version bytes prepended to a 20-byte hash
/// before base58check encoding (one byte for Bitcoin-style chains, two for
/// Zcash transparent addresses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub coin: String,
    pub pubkey_hash_prefix: Vec<u8>,
    pub script_hash_prefix: Vec<u8>,
    /// Whether transactions on this chain may carry shielded-pool fields.
    #[serde(default)]
    pub shielded_capable: bool,
}

impl NetworkParams {
    pub fn bitcoin() -> Self {
        Self {
            coin: "btc".into(),
            pubkey_hash_prefix: vec![0x00],
            script_hash_prefix: vec![0x05],
            shielded_capable: false,
        }
    }

    pub fn komodo() -> Self {
        Self {
            coin: "kmd".into(),
            pubkey_hash_prefix: vec![60],
            script_hash_prefix: vec![85],
            shielded_capable: true,
        }
    }

    pub fn verus() -> Self {
        Self {
            coin: "vrsc".into(),
            pubkey_hash_prefix: vec![60],
            script_hash_prefix: vec![85],
            shielded_capable: true,
        }
    }

    pub fn zcash() -> Self {
        Self {
            coin: "zec".into(),
            pubkey_hash_prefix: vec![0x1c, 0xb8],
            script_hash_prefix: vec![0x1c, 0xbd],
            shielded_capable: true,
        }
    }

    /// Names accepted by [`NetworkParams::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["btc", "kmd", "vrsc", "zec"]
    }

    /// Look up a built-in network by chain identifier or full name.
    pub fn preset(name: &str) -> Result<Self, CoreError> {
        match name.to_ascii_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(Self::bitcoin()),
            "kmd" | "komodo" => Ok(Self::komodo()),
            "vrsc" | "verus" => Ok(Self::verus()),
            "zec" | "zcash" => Ok(Self::zcash()),
            other => Err(CoreError::InvalidNetwork(format!(
                "unknown network preset `{other}`"
            ))),
        }
    }

    /// Reject parameter sets that cannot encode addresses.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.coin.trim().is_empty() {
            return Err(CoreError::InvalidNetwork("coin must not be empty".into()));
        }
        if self.pubkey_hash_prefix.is_empty() || self.script_hash_prefix.is_empty() {
            return Err(CoreError::InvalidNetwork(
                "address prefixes must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn is_reward_bearing(&self) -> bool {
        is_reward_bearing_coin(&self.coin)
    }

    // -- Address encoding -----------------------------------------------------

    #[must_use]
    pub fn p2pkh_address(&self, pubkey_hash: &[u8; 20]) -> String {
        encode_address(&self.pubkey_hash_prefix, pubkey_hash)
    }

    #[must_use]
    pub fn p2sh_address(&self, script_hash: &[u8; 20]) -> String {
        encode_address(&self.script_hash_prefix, script_hash)
    }

    /// Address of a raw public key: the pubkey-hash address of its HASH160.
    /// The key bytes are not validated as a curve point.
    #[must_use]
    pub fn pubkey_address(&self, pubkey: &[u8]) -> String {
        let hash = hash160::Hash::hash(pubkey).to_byte_array();
        self.p2pkh_address(&hash)
    }
}

fn encode_address(prefix: &[u8], hash: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(prefix.len() + hash.len());
    payload.extend_from_slice(prefix);
    payload.extend_from_slice(hash);
    bitcoin::base58::encode_check(&payload)
}
