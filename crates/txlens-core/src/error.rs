#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid transaction hex: {0}")]
    InvalidHex(String),

    #[error("transaction could not be decoded: {0}")]
    Decode(String),

    #[error("parent transaction for input {position} unavailable: {reason}")]
    ParentLookup { position: usize, reason: String },

    #[error("invalid network parameters: {0}")]
    InvalidNetwork(String),
}
