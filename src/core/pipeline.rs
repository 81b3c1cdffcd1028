use crate::core::export::{build_archive, to_csv};
use crate::core::orchestrator::normalize_pages;
use crate::core::{ConfigProvider, Pipeline, RawTable, Storage, TableExtractor, TransformResult};
use crate::utils::error::Result;

/// Extract pages from a [`TableExtractor`], normalize them under the
/// configured schema and legend, and store the CSV as a ZIP archive.
pub struct RolPipeline<S: Storage, E: TableExtractor, C: ConfigProvider> {
    storage: S,
    extractor: E,
    config: C,
}

impl<S: Storage, E: TableExtractor, C: ConfigProvider> RolPipeline<S, E, C> {
    pub fn new(storage: S, extractor: E, config: C) -> Self {
        Self {
            storage,
            extractor,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, E: TableExtractor, C: ConfigProvider> Pipeline for RolPipeline<S, E, C> {
    async fn extract(&self) -> Result<Vec<Vec<RawTable>>> {
        let page_count = self.extractor.page_count();
        tracing::debug!("Reading {} page(s) from {}", page_count, self.config.input_path());

        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            pages.push(self.extractor.extract_page(index)?);
        }
        Ok(pages)
    }

    async fn transform(&self, pages: Vec<Vec<RawTable>>) -> Result<TransformResult> {
        let schema = self.config.schema();
        let legend = self.config.legend();

        let (table, stats) = normalize_pages(pages, &schema, &legend)?;
        let csv_output = to_csv(&table)?;

        Ok(TransformResult {
            table,
            stats,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let archive_name = self.config.archive_name();
        let csv_name = self.config.csv_name();
        let output_path = format!("{}/{}", self.config.output_path(), archive_name);

        tracing::debug!(
            "Creating ZIP file with {} ({} bytes of CSV)",
            csv_name,
            result.csv_output.len()
        );
        let zip_data = build_archive(&csv_name, &result.csv_output)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive_name, &zip_data).await?;

        Ok(output_path)
    }
}
