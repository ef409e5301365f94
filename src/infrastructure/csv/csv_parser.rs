// ============================================================
// CSV PARSER
// ============================================================
// Decode uploaded bytes and tokenise the sampled head of a CSV

use crate::domain::csv::{CsvDialect, RawTable, SAMPLE_DATA_ROWS};
use csv::ReaderBuilder;
use tracing::warn;

/// Reads the header and the sampling window of a CSV document
pub struct CsvParser {
    dialect: CsvDialect,

    /// Data rows kept after the header
    sample_rows: usize,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            dialect: CsvDialect::default(),
            sample_rows: SAMPLE_DATA_ROWS,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Decode raw upload bytes. UTF-8 (with or without BOM) first,
    /// Windows-1252 when the bytes are not valid UTF-8.
    pub fn decode(bytes: &[u8]) -> String {
        let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }

        warn!("Upload is not valid UTF-8, decoding as Windows-1252");
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        text.into_owned()
    }

    /// Parse the header plus at most `sample_rows` data rows.
    /// Never fails: malformed input yields a short or empty table.
    pub fn parse_sample(&self, content: &str) -> RawTable {
        match self.dialect {
            CsvDialect::Naive => self.parse_naive(content),
            CsvDialect::Quoted => self.parse_quoted(content),
        }
    }

    fn parse_naive(&self, content: &str) -> RawTable {
        let mut lines = sample_lines(content, self.sample_rows);

        let headers = match lines.next() {
            Some(header) => split_cells(header),
            None => return RawTable::default(),
        };

        let rows = lines.map(split_cells).collect();

        RawTable::new(headers, rows)
    }

    /// Same line window as the naive dialect; only the tokenising of each
    /// line differs. A blank line is a single empty cell in both.
    fn parse_quoted(&self, content: &str) -> RawTable {
        let mut lines = sample_lines(content, self.sample_rows);

        let headers = match lines.next().map(parse_record) {
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                warn!(error = %e, "Failed to read CSV header");
                return RawTable::default();
            }
            None => return RawTable::default(),
        };

        let rows = lines
            .enumerate()
            .map(|(index, line)| match parse_record(line) {
                Ok(record) => record,
                Err(e) => {
                    // An unreadable row disqualifies every column it would have covered
                    warn!(row = index + 1, error = %e, "Skipping malformed CSV row");
                    Vec::new()
                }
            })
            .collect();

        RawTable::new(headers, rows)
    }
}

/// Header line plus at most `sample_rows` raw lines, `\r` stripped.
fn sample_lines(content: &str, sample_rows: usize) -> impl Iterator<Item = &str> {
    content
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .take(sample_rows + 1)
}

fn parse_record(line: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(vec![String::new()]),
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}
