//! Collects the extractor's per-page tables and runs the normalization steps
//! over them once every page is in.

use crate::core::coerce::apply_schema;
use crate::core::filter::drop_empty_rows;
use crate::core::legend::apply_legends;
use crate::core::unify::unify;
use crate::domain::model::{LegendMap, RawTable, TargetSchema, TransformStats, UnifiedTable};
use crate::domain::ports::TableExtractor;
use crate::utils::error::{EtlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Collecting,
    Normalized,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Collecting => "collecting",
            RunState::Normalized => "normalized",
            RunState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Collecting)
    }
}

pub struct TableOrchestrator<'a> {
    schema: &'a TargetSchema,
    legend: &'a LegendMap,
    tables: Vec<RawTable>,
    stats: TransformStats,
    state: RunState,
}

impl<'a> TableOrchestrator<'a> {
    pub fn new(schema: &'a TargetSchema, legend: &'a LegendMap) -> Self {
        Self {
            schema,
            legend,
            tables: Vec::new(),
            stats: TransformStats::default(),
            state: RunState::Collecting,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    fn ensure_collecting(&self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(EtlError::InvalidState {
                expected: RunState::Collecting.as_str(),
                actual: self.state.as_str(),
            });
        }
        Ok(())
    }

    /// Accepts the tables of the next page. A page may carry no table at all.
    pub fn collect_page(&mut self, tables: Vec<RawTable>) -> Result<()> {
        self.ensure_collecting()?;
        self.stats.pages += 1;
        let page = self.stats.pages;

        for table in tables {
            if table.has_data() {
                self.stats.tables_collected += 1;
                self.tables.push(table);
            } else {
                tracing::debug!(
                    "Page {}: skipping table with {} row(s) and no data row",
                    page,
                    table.row_count()
                );
                self.stats.tables_skipped += 1;
            }
        }
        Ok(())
    }

    /// Ends the run after an upstream failure. Collected tables are dropped so
    /// nothing partial can be produced.
    pub fn abort(&mut self) {
        self.tables.clear();
        self.state = RunState::Failed;
    }

    /// Unify, drop empty rows, resolve legends, coerce. Fails with
    /// [`EtlError::EmptyInput`] when no page produced a usable table.
    pub fn finish(&mut self) -> Result<(UnifiedTable, TransformStats)> {
        self.ensure_collecting()?;

        if self.tables.is_empty() {
            tracing::error!("❌ No table extracted from {} page(s)", self.stats.pages);
            self.state = RunState::Failed;
            return Err(EtlError::EmptyInput {
                pages: self.stats.pages,
            });
        }

        let tables = std::mem::take(&mut self.tables);
        let mut table = unify(&tables);
        self.stats.rows_unified = table.row_count();
        tracing::info!(
            "🧩 Unified {} table(s) into {} row(s) x {} column(s)",
            tables.len(),
            table.row_count(),
            table.columns().len()
        );

        self.stats.rows_dropped = drop_empty_rows(&mut table);
        self.stats.legend_substitutions = apply_legends(&mut table, self.legend);
        self.stats.integer_misses = apply_schema(&mut table, self.schema);

        self.state = RunState::Normalized;
        tracing::info!(
            "✅ Normalized {} row(s) ({} empty dropped, {} legend substitution(s))",
            table.row_count(),
            self.stats.rows_dropped,
            self.stats.legend_substitutions
        );

        Ok((table, self.stats.clone()))
    }
}

/// Runs the whole normalization over tables already grouped by page.
pub fn normalize_pages(
    pages: Vec<Vec<RawTable>>,
    schema: &TargetSchema,
    legend: &LegendMap,
) -> Result<(UnifiedTable, TransformStats)> {
    let mut orchestrator = TableOrchestrator::new(schema, legend);
    for tables in pages {
        orchestrator.collect_page(tables)?;
    }
    orchestrator.finish()
}

/// Pulls every page from `extractor` in order and normalizes the result.
/// The first extraction error aborts the run.
pub fn normalize_document<E: TableExtractor + ?Sized>(
    extractor: &E,
    schema: &TargetSchema,
    legend: &LegendMap,
) -> Result<(UnifiedTable, TransformStats)> {
    let mut orchestrator = TableOrchestrator::new(schema, legend);
    let page_count = extractor.page_count();

    for index in 0..page_count {
        tracing::debug!("Extracting page {}/{}", index + 1, page_count);
        match extractor.extract_page(index) {
            Ok(tables) => orchestrator.collect_page(tables)?,
            Err(e) => {
                orchestrator.abort();
                return Err(e);
            }
        }
    }

    orchestrator.finish()
}
