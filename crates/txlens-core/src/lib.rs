pub mod classify;
pub mod decode;
pub mod error;
pub mod format;
pub mod network;
pub mod resolve;
pub mod script;
pub mod txid;
pub mod types;

#[cfg(test)]
mod test_util;

pub use classify::{classify_transaction, ClassifyOptions};
pub use decode::decode;
pub use error::CoreError;
pub use format::{format_batch, format_transaction, TxBundle};
pub use network::NetworkParams;
pub use resolve::ParentLookup;
pub use types::{Classification, ClassificationRecord, ClassificationType, DecodedTransaction};
