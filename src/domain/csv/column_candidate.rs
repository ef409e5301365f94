use serde::{Deserialize, Serialize};

/// A header name paired with its numeric-eligibility verdict.
/// Derived per upload, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCandidate {
    pub name: String,
    pub numeric: bool,
}

impl ColumnCandidate {
    pub fn new(name: impl Into<String>, numeric: bool) -> Self {
        Self {
            name: name.into(),
            numeric,
        }
    }
}
