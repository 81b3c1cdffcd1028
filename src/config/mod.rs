pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::export::{csv_name_for, DEFAULT_ARCHIVE_NAME};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{LegendMap, TargetSchema};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// Command-line configuration. Schema and legend are the built-in annex ones;
/// use a TOML file (`toml_etl`) to change them.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rol-etl")]
#[command(about = "Normalizes the Rol de Procedimentos tables produced by the table extractor")]
pub struct CliConfig {
    /// Extractor output: JSON document with the table grids of every page
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// Name of the CSV inside the archive (defaults to the input file stem)
    #[arg(long)]
    pub csv_name: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage between phases")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn csv_name(&self) -> String {
        self.csv_name
            .clone()
            .unwrap_or_else(|| csv_name_for(&self.input))
    }

    fn schema(&self) -> TargetSchema {
        TargetSchema::rol_procedimentos()
    }

    fn legend(&self) -> LegendMap {
        LegendMap::rol_procedimentos()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extensions("input", std::slice::from_ref(&self.input), &["json"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extensions(
            "archive_name",
            std::slice::from_ref(&self.archive_name),
            &["zip"],
        )?;
        if let Some(csv_name) = &self.csv_name {
            validation::validate_file_extensions("csv_name", std::slice::from_ref(csv_name), &["csv"])?;
        }
        Ok(())
    }
}
