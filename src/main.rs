use clap::Parser;
use rol_etl::core::ConfigProvider;
use rol_etl::utils::error::exit_with;
use rol_etl::utils::{logger, validation::Validate};
use rol_etl::{CliConfig, EtlEngine, JsonTableExtractor, LocalStorage, RolPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting rol-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let extractor = match JsonTableExtractor::from_file(config.input_path()) {
        Ok(extractor) => extractor,
        Err(e) => exit_with("Could not load the extractor output", e),
    };
    tracing::info!(
        "📄 Source document: {}",
        extractor.source().unwrap_or(config.input_path())
    );

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = RolPipeline::new(storage, extractor, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with("ETL process failed", e),
    }

    Ok(())
}
