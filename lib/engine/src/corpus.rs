use crate::table::Row;

/// Flatten rows into the retrieval corpus: one text blob per row, all cell
/// values joined with single spaces in column order. Row order is preserved
/// because index search results are positions into this sequence.
#[must_use]
pub fn build_corpus(rows: &[Row]) -> Vec<String> {
    rows.iter().map(row_text).collect()
}

/// Flatten one row; column names are not part of the text
#[must_use]
pub fn row_text(row: &Row) -> String {
    row.fields()
        .iter()
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
