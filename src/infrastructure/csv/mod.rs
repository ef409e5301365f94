// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Upload decoding, sampled parsing and numeric column inference

mod column_inferencer;
mod csv_parser;

pub use column_inferencer::ColumnInferencer;
pub use csv_parser::CsvParser;
