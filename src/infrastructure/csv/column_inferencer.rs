// ============================================================
// COLUMN INFERENCER
// ============================================================
// Decide which CSV columns can be offered as a numeric target

use super::CsvParser;
use crate::domain::csv::{ColumnCandidate, CsvDialect, RawTable};

/// Numeric sniffing over the sampled head of a CSV
pub struct ColumnInferencer {
    parser: CsvParser,
}

impl ColumnInferencer {
    pub fn new(dialect: CsvDialect) -> Self {
        Self {
            parser: CsvParser::new().with_dialect(dialect),
        }
    }

    /// Header names eligible as a target, in column order.
    /// Empty when the text has no data row.
    pub fn numeric_columns(&self, content: &str) -> Vec<String> {
        self.candidates(content)
            .into_iter()
            .filter(|candidate| candidate.numeric)
            .map(|candidate| candidate.name)
            .collect()
    }

    /// Every header with its verdict
    pub fn candidates(&self, content: &str) -> Vec<ColumnCandidate> {
        let table = self.parser.parse_sample(content);
        Self::evaluate(&table)
    }

    /// A column is eligible only if every sampled row has a cell at its
    /// position that is non-blank and parses as an f64 other than NaN.
    pub fn evaluate(table: &RawTable) -> Vec<ColumnCandidate> {
        let has_rows = table.has_data_rows();

        table
            .headers
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let numeric = has_rows
                    && (0..table.rows.len())
                        .all(|row| table.cell(row, column).map(is_numeric_cell).unwrap_or(false));
                ColumnCandidate::new(name.clone(), numeric)
            })
            .collect()
    }
}

impl Default for ColumnInferencer {
    fn default() -> Self {
        Self::new(CsvDialect::default())
    }
}

fn is_numeric_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return false;
    }

    trimmed
        .parse::<f64>()
        .map(|value| !value.is_nan())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::SAMPLE_DATA_ROWS;

    #[test]
    fn test_text_column_is_never_numeric() {
        let inferencer = ColumnInferencer::default();
        assert_eq!(
            inferencer.numeric_columns("a,b,c\n1,2,x\n3,4,y\n5,6,z\n"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_blank_cell_disqualifies_column() {
        let inferencer = ColumnInferencer::default();
        assert_eq!(inferencer.numeric_columns("a,b\n1,\n2,3\n"), vec!["a"]);
    }

    #[test]
    fn test_fewer_than_two_lines_is_empty() {
        let inferencer = ColumnInferencer::default();
        assert!(inferencer.numeric_columns("").is_empty());
        assert!(inferencer.numeric_columns("a,b,c").is_empty());
        assert!(inferencer.numeric_columns("a,b,c\n").is_empty());
    }

    #[test]
    fn test_ragged_row_disqualifies_missing_columns_only() {
        let inferencer = ColumnInferencer::default();
        assert_eq!(inferencer.numeric_columns("a,b,c\n1,2,3\n4\n"), vec!["a"]);
    }

    #[test]
    fn test_whitespace_and_float_literals() {
        let inferencer = ColumnInferencer::default();
        let content = "a,b,c,d\n 1.5 ,1e10,-3,.5\n2, 2E-3 ,+4,6.\n";
        assert_eq!(inferencer.numeric_columns(content), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_nan_and_partial_numbers_rejected() {
        let inferencer = ColumnInferencer::default();
        let content = "a,b,c\nNaN,12abc,1\n1,2,2\n";
        assert_eq!(inferencer.numeric_columns(content), vec!["c"]);
    }

    #[test]
    fn test_rows_past_sampling_window_are_ignored() {
        let mut content = String::from("id,label\n");
        for i in 0..SAMPLE_DATA_ROWS {
            content.push_str(&format!("{},{}\n", i, i * 2));
        }
        content.push_str("oops,text\n");

        let inferencer = ColumnInferencer::default();
        assert_eq!(inferencer.numeric_columns(&content), vec!["id", "label"]);
    }

    #[test]
    fn test_candidates_keep_column_order() {
        let inferencer = ColumnInferencer::default();
        let candidates = inferencer.candidates("city,price\nNYC,10\n");
        assert_eq!(
            candidates,
            vec![
                ColumnCandidate::new("city", false),
                ColumnCandidate::new("price", true),
            ]
        );
    }

    #[test]
    fn test_quoted_dialect_keeps_quoted_commas_in_one_cell() {
        let content = "name,price\n\"Smith, J\",10\n\"Doe, A\",12\n";
        assert!(ColumnInferencer::new(CsvDialect::Naive)
            .numeric_columns(content)
            .is_empty());
        assert_eq!(
            ColumnInferencer::new(CsvDialect::Quoted).numeric_columns(content),
            vec!["price"]
        );
    }

    #[test]
    fn test_dialects_agree_on_blank_lines_and_window() {
        let mut late_junk = String::from("id\n");
        for i in 0..SAMPLE_DATA_ROWS - 1 {
            late_junk.push_str(&format!("{}\n", i));
        }
        late_junk.push_str("\n\n7\n");

        for content in ["a,b\n1,2\n\n3,4\n", "a,b\n1,2\n\n", late_junk.as_str()] {
            let naive = ColumnInferencer::new(CsvDialect::Naive).numeric_columns(content);
            let quoted = ColumnInferencer::new(CsvDialect::Quoted).numeric_columns(content);
            assert_eq!(naive, quoted, "{:?}", content);
        }
        assert!(ColumnInferencer::new(CsvDialect::Quoted)
            .numeric_columns("a,b\n1,2\n\n3,4\n")
            .is_empty());
    }

    #[test]
    fn test_every_reported_column_holds_numbers_in_every_sampled_row() {
        let inputs = [
            "a,b,c\n1,2,3\n4,,6\n7,8\n",
            "x,y\n1,y\n\n2,3\n",
            "p,q,r\n0.1,abc,3\n0.2,4,5\n0.3,6,inf\n",
            "solo\n42\n",
        ];
        let parser = CsvParser::new();
        let inferencer = ColumnInferencer::default();

        for input in inputs {
            let table = parser.parse_sample(input);
            for name in inferencer.numeric_columns(input) {
                let column = table.headers.iter().position(|h| *h == name).unwrap();
                for row in 0..table.rows.len() {
                    let cell = table.cell(row, column).unwrap();
                    assert!(is_numeric_cell(cell), "{:?} in {:?}", cell, input);
                }
            }
        }
    }
}
