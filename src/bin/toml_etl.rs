use anyhow::Context;
use clap::Parser;
use rol_etl::core::orchestrator::normalize_document;
use rol_etl::core::ConfigProvider;
use rol_etl::domain::model::ColumnType;
use rol_etl::utils::error::exit_with;
use rol_etl::utils::{logger, validation::Validate};
use rol_etl::{EtlEngine, JsonTableExtractor, LocalStorage, RolPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Rol de Procedimentos ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rol-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Normalize and report without writing the archive
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logging() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based rol-etl");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let extractor = match JsonTableExtractor::from_file(config.input_path()) {
        Ok(extractor) => extractor,
        Err(e) => exit_with("Could not load the extractor output", e),
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        if let Err(e) = perform_dry_run(&config, &extractor) {
            exit_with("Dry run failed", e);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
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

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("   Source: {}", config.input_path());
    tracing::info!(
        "   Output: {}/{} ({})",
        config.output_path(),
        config.archive_name(),
        config.csv_name()
    );

    let schema = config.schema();
    let integer_columns: Vec<&str> = schema
        .columns()
        .iter()
        .filter(|(_, t)| *t == ColumnType::NullableInteger)
        .map(|(label, _)| label.as_str())
        .collect();
    tracing::info!(
        "   Schema: {} column(s), nullable integers: {:?}",
        schema.len(),
        integer_columns
    );

    let legend = config.legend();
    let mut legend_columns: Vec<&str> = legend.columns().collect();
    legend_columns.sort_unstable();
    tracing::info!("   Legend columns: {:?}", legend_columns);
}

fn perform_dry_run(config: &TomlConfig, extractor: &JsonTableExtractor) -> rol_etl::Result<()> {
    let (table, stats) = normalize_document(extractor, &config.schema(), &config.legend())?;

    println!("🔍 Dry run for {}", extractor.source().unwrap_or(config.input_path()));
    println!("   Pages: {}", stats.pages);
    println!(
        "   Tables: {} collected, {} without data rows",
        stats.tables_collected, stats.tables_skipped
    );
    println!(
        "   Rows: {} unified, {} empty dropped, {} kept",
        stats.rows_unified,
        stats.rows_dropped,
        table.row_count()
    );
    println!("   Legend substitutions: {}", stats.legend_substitutions);
    println!("   Integer values nulled: {}", stats.integer_misses);
    println!("   Columns: {}", table.columns().join(", "));
    Ok(())
}
