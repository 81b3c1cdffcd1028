use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract → transform → load. Load never runs once an earlier
    /// phase has failed.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting ETL process...");
        self.monitor.log_stats("Start");

        tracing::info!("📥 Extracting tables...");
        let pages = self.pipeline.extract().await?;
        let table_count: usize = pages.iter().map(Vec::len).sum();
        tracing::info!("Extracted {} table(s) from {} page(s)", table_count, pages.len());
        self.monitor.log_stats("Extract");

        tracing::info!("🔄 Normalizing tables...");
        let result = self.pipeline.transform(pages).await?;
        tracing::info!(
            "Normalized {} record(s) across {} column(s)",
            result.table.row_count(),
            result.table.columns().len()
        );
        tracing::debug!("Transform stats: {:?}", result.stats);
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Loading data...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
