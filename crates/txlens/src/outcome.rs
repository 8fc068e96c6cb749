use serde::Serialize;

use txlens_core::{Classification, ClassificationRecord, CoreError};

/// Per-transaction entry of a batch result. Failures are reported in place
/// so one bad bundle never hides the others.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum FormatOutcome {
    Records { records: Vec<ClassificationRecord> },
    Failed { error: String },
}

impl From<Result<Classification, CoreError>> for FormatOutcome {
    fn from(result: Result<Classification, CoreError>) -> Self {
        match result {
            Ok(classification) => Self::Records {
                records: classification.into_records(),
            },
            Err(err) => Self::Failed {
                error: err.to_string(),
            },
        }
    }
}
