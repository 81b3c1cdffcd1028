//! Adapter for the output of the external table extractor.
//!
//! The extractor runs the layout analysis on the source document and writes
//! one JSON document per run:
//!
//! ```json
//! { "source": "Anexo_I.pdf",
//!   "pages": [ { "page": 1, "tables": [[["PROCEDIMENTO", "OD"], ["Consulta", null]]] },
//!              { "page": 2, "error": "corrupt xref table" } ] }
//! ```
//!
//! A page that carries `error` failed upstream and aborts the run when read.

use crate::domain::model::RawTable;
use crate::domain::ports::TableExtractor;
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct ExtractedPage {
    page: Option<usize>,
    #[serde(default)]
    tables: Vec<RawTable>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExtractedDocument {
    #[serde(default)]
    source: Option<String>,
    pages: Vec<ExtractedPage>,
}

#[derive(Debug, Clone)]
pub struct JsonTableExtractor {
    source: Option<String>,
    pages: Vec<ExtractedPage>,
}

impl JsonTableExtractor {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let document: ExtractedDocument =
            serde_json::from_slice(data).map_err(|e| EtlError::ExtractionError {
                page: 0,
                message: format!("unreadable extractor output: {}", e),
            })?;

        tracing::debug!(
            "Loaded extractor output for {:?} with {} page(s)",
            document.source,
            document.pages.len()
        );

        Ok(Self {
            source: document.source,
            pages: document.pages,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)?;
        Self::from_slice(&data)
    }

    /// Name of the document the tables were extracted from, when recorded.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

impl TableExtractor for JsonTableExtractor {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_page(&self, index: usize) -> Result<Vec<RawTable>> {
        let page = self.pages.get(index).ok_or_else(|| EtlError::ExtractionError {
            page: index + 1,
            message: format!("page out of range ({} page(s))", self.pages.len()),
        })?;
        let number = page.page.unwrap_or(index + 1);

        if let Some(message) = &page.error {
            return Err(EtlError::ExtractionError {
                page: number,
                message: message.clone(),
            });
        }

        tracing::debug!("Page {}: {} table(s)", number, page.tables.len());
        Ok(page.tables.clone())
    }
}

/// Tables already in memory, grouped by page.
impl TableExtractor for Vec<Vec<RawTable>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn extract_page(&self, index: usize) -> Result<Vec<RawTable>> {
        self.get(index).cloned().ok_or_else(|| EtlError::ExtractionError {
            page: index + 1,
            message: format!("page out of range ({} page(s))", self.len()),
        })
    }
}
