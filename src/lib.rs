pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    etl::EtlEngine, extract::JsonTableExtractor, orchestrator::TableOrchestrator,
    pipeline::RolPipeline,
};
pub use domain::model::{CellValue, ColumnType, LegendMap, RawTable, TargetSchema, UnifiedTable};
pub use utils::error::{EtlError, Result};
