// ============================================================
// CSV DIALECT
// ============================================================
// Selects how a CSV line is tokenised into cells

use serde::{Deserialize, Serialize};

/// Tokenisation rule applied to uploaded CSV text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// Split every line on `,` with no quote or escape handling.
    /// A quoted field containing a comma is split into several cells.
    #[default]
    Naive,

    /// RFC 4180 style quoting via the `csv` crate
    Quoted,
}

impl CsvDialect {
    pub fn description(&self) -> &'static str {
        match self {
            CsvDialect::Naive => "comma split, no quoting",
            CsvDialect::Quoted => "comma separated with double-quote escaping",
        }
    }
}

impl std::fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvDialect::Naive => write!(f, "naive"),
            CsvDialect::Quoted => write!(f, "quoted"),
        }
    }
}
