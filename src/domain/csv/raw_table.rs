// ============================================================
// RAW TABLE
// ============================================================
// Header plus the sampled data rows of an uploaded CSV

use serde::{Deserialize, Serialize};

/// Number of data rows (after the header) examined during inference.
/// Fixed so column sniffing stays fast regardless of file size.
pub const SAMPLE_DATA_ROWS: usize = 14;

/// Positionally aligned string cells. Rows may be shorter or longer
/// than the header; callers must go through [`RawTable::cell`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell at `(row, column)`, `None` when the row is ragged.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    pub fn has_data_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}
