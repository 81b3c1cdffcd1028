use crate::domain::model::{LegendMap, RawTable, TargetSchema, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
    fn csv_name(&self) -> String;
    fn schema(&self) -> TargetSchema;
    fn legend(&self) -> LegendMap;
}

/// Source of per-page table grids, header row first.
///
/// Pages are requested in order, once each. An error on any page aborts the
/// whole run.
pub trait TableExtractor: Send + Sync {
    fn page_count(&self) -> usize;
    fn extract_page(&self, index: usize) -> Result<Vec<RawTable>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Vec<RawTable>>>;
    async fn transform(&self, pages: Vec<Vec<RawTable>>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
