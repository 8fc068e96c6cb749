//! Input resolution: attach to every input the parent output it spends.
//!
//! Parents are supplied positionally by the caller (one lookup per input,
//! already fetched). Lookup failures abort the whole transaction; anything
//! else that prevents resolving a single input leaves that input
//! `Unresolved`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decode::decode;
use crate::error::CoreError;
use crate::network::NetworkParams;
use crate::types::{DecodedTransaction, RawInput, ResolvedInput};

/// Outcome of fetching one parent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParentLookup {
    Found { hex: String },
    NotFound,
    Failed { code: i64, message: String },
}

impl ParentLookup {
    pub fn found(hex: impl Into<String>) -> Self {
        Self::Found { hex: hex.into() }
    }

    fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Found { .. } => None,
            Self::NotFound => Some("parent transaction not found".into()),
            Self::Failed { code, message } => Some(format!("lookup failed ({code}): {message}")),
        }
    }
}

/// Fail on the first parent that could not be fetched.
pub fn ensure_parents_available(parents: &[ParentLookup]) -> Result<(), CoreError> {
    for (position, parent) in parents.iter().enumerate() {
        if let Some(reason) = parent.failure_reason() {
            return Err(CoreError::ParentLookup { position, reason });
        }
    }
    Ok(())
}

/// Resolve `inputs` against `parents`, where `parents[i]` is the transaction
/// spent by `inputs[i]`.
pub fn resolve_inputs(
    inputs: &[RawInput],
    parents: &[ParentLookup],
    network: &NetworkParams,
) -> Result<Vec<ResolvedInput>, CoreError> {
    ensure_parents_available(parents)?;

    // The same parent may fund several inputs; decode each hex once.
    let mut decoded: HashMap<&str, Option<DecodedTransaction>> = HashMap::new();

    let resolved = inputs
        .iter()
        .enumerate()
        .map(|(position, input)| {
            if input.is_coinbase() {
                return ResolvedInput::Unresolved;
            }
            let Some(ParentLookup::Found { hex }) = parents.get(position) else {
                tracing::debug!(position, "no parent supplied for input");
                return ResolvedInput::Unresolved;
            };

            let parent = decoded.entry(hex.as_str()).or_insert_with(|| {
                decode(hex, network)
                    .map_err(|e| tracing::debug!(position, error = %e, "parent failed to decode"))
                    .ok()
            });
            let Some(parent) = parent.as_ref() else {
                return ResolvedInput::Unresolved;
            };

            if parent.txid != input.previous_txid {
                tracing::warn!(
                    position,
                    expected = %input.previous_txid,
                    actual = %parent.txid,
                    "parent id does not match the spent outpoint"
                );
            }

            let output = usize::try_from(input.previous_output_index)
                .ok()
                .and_then(|index| parent.outputs.get(index));
            match output {
                Some(output) => ResolvedInput::Resolved(output.clone()),
                None => {
                    tracing::debug!(
                        position,
                        index = input.previous_output_index,
                        outputs = parent.outputs.len(),
                        "spent output index out of range"
                    );
                    ResolvedInput::Unresolved
                }
            }
        })
        .collect();

    Ok(resolved)
}
