//! Row-oriented export of a normalized table: CSV text inside a ZIP archive.

use crate::domain::model::UnifiedTable;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const DEFAULT_ARCHIVE_NAME: &str = "rol_procedimentos.zip";

/// Header row with the column labels, then one record per row. `Null` is an
/// empty field and integers are written as plain digits.
pub fn to_csv(table: &UnifiedTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// A ZIP holding a single deflated CSV entry.
pub fn build_archive(csv_name: &str, csv_output: &str) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file(csv_name, options)?;
    zip.write_all(csv_output.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// `<input stem>.csv`, or `output.csv` when the input has no usable stem.
pub fn csv_name_for(input_path: &str) -> String {
    let stem = Path::new(input_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("output");
    format!("{}.csv", stem)
}
