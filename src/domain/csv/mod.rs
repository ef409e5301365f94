// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types for target-column inference
// No I/O, no async, no external dependencies

mod column_candidate;
mod dialect;
mod raw_table;

pub use column_candidate::ColumnCandidate;
pub use dialect::CsvDialect;
pub use raw_table::{RawTable, SAMPLE_DATA_ROWS};
