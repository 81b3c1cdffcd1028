//! Cell-level text cleanup shared by every table that enters the pipeline.

use crate::domain::model::CellValue;

/// Replaces line breaks with spaces, collapses whitespace runs to a single
/// space and trims both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form of a cell. `Null` stays `Null`; everything else becomes
/// cleaned text.
pub fn normalize(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Null => CellValue::Null,
        CellValue::Text(s) => CellValue::Text(clean_text(s)),
        CellValue::Integer(n) => CellValue::Text(n.to_string()),
    }
}

/// Same as [`normalize`] for a cell straight out of the extractor.
pub fn normalize_raw(cell: Option<&str>) -> CellValue {
    match cell {
        None => CellValue::Null,
        Some(s) => CellValue::Text(clean_text(s)),
    }
}
