use crate::core::export::{csv_name_for, DEFAULT_ARCHIVE_NAME};
use crate::core::ConfigProvider;
use crate::domain::model::{ColumnSpec, LegendMap, TargetSchema};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub schema: Option<SchemaConfig>,
    /// `[legend.<COLUMN>]` tables of `CODE = "description"`.
    pub legend: Option<HashMap<String, HashMap<String, String>>>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Extractor output document.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub archive_name: Option<String>,
    pub csv_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// `compact` (default) or `json`.
    pub log_format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn archive_name(&self) -> &str {
        self.load.archive_name.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME)
    }

    fn csv_name(&self) -> String {
        self.load
            .csv_name
            .clone()
            .unwrap_or_else(|| csv_name_for(&self.source.path))
    }

    fn schema(&self) -> TargetSchema {
        match &self.schema {
            Some(schema) => TargetSchema::from(schema.columns.clone()),
            None => TargetSchema::rol_procedimentos(),
        }
    }

    fn legend(&self) -> LegendMap {
        match &self.legend {
            Some(legend) => LegendMap::from(legend.clone()),
            None => LegendMap::rol_procedimentos(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_file_extensions(
            "source.path",
            std::slice::from_ref(&self.source.path),
            &["json"],
        )?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_extensions(
            "load.archive_name",
            &[self.archive_name().to_string()],
            &["zip"],
        )?;
        if let Some(csv_name) = &self.load.csv_name {
            validation::validate_file_extensions(
                "load.csv_name",
                std::slice::from_ref(csv_name),
                &["csv"],
            )?;
        }

        if let Some(schema) = &self.schema {
            validation::validate_positive_number("schema.columns", schema.columns.len(), 1)?;
        }
        validation::validate_unique_columns("schema.columns", &self.schema())?;

        if let Some(monitoring) = &self.monitoring {
            if let Some(format) = &monitoring.log_format {
                if !["compact", "json"].contains(&format.to_ascii_lowercase().as_str()) {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "monitoring.log_format".to_string(),
                        value: format.clone(),
                        reason: "Supported formats: compact, json".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ColumnType;

    const MINIMAL: &str = r#"
[pipeline]
name = "rol"

[source]
path = "Anexo_I.json"

[load]
output_path = "./output"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.archive_name(), DEFAULT_ARCHIVE_NAME);
        assert_eq!(config.csv_name(), "Anexo_I.csv");
        assert_eq!(config.schema(), TargetSchema::rol_procedimentos());
        assert_eq!(config.legend(), LegendMap::rol_procedimentos());
        assert!(!config.monitoring_enabled());
        assert!(!config.json_logging());
    }

    #[test]
    fn test_custom_schema_and_legend() {
        let content = r#"
[pipeline]
name = "custom"

[source]
path = "pages.json"

[schema]
columns = [
    { name = "PROCEDIMENTO", type = "text" },
    { name = "DUT", type = "nullable-integer" },
]

[legend.HCO]
HCO = "Hospitalar com obstetrícia"

[load]
output_path = "out"
archive_name = "custom.zip"
csv_name = "custom.csv"

[monitoring]
enabled = true
log_format = "json"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();

        assert!(config.validate().is_ok());
        let schema = config.schema();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("DUT"), Some(ColumnType::NullableInteger));
        let legend = config.legend();
        assert_eq!(
            legend.codes_for("HCO").and_then(|c| c.get("HCO")).map(String::as_str),
            Some("Hospitalar com obstetrícia")
        );
        assert!(legend.codes_for("OD").is_none());
        assert_eq!(config.archive_name(), "custom.zip");
        assert!(config.monitoring_enabled());
        assert!(config.json_logging());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ROL_ETL_TEST_OUTPUT_DIR", "/data/rol");
        let content = MINIMAL.replace("./output", "${ROL_ETL_TEST_OUTPUT_DIR}");

        let config = TomlConfig::from_toml_str(&content).unwrap();

        assert_eq!(config.output_path(), "/data/rol");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let content = MINIMAL.replace("./output", "${ROL_ETL_SURELY_UNSET_VAR}");
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.output_path(), "${ROL_ETL_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_source = MINIMAL.replace("Anexo_I.json", "Anexo_I.pdf");
        assert!(TomlConfig::from_toml_str(&bad_source).unwrap().validate().is_err());

        let duplicate = format!(
            "{}\n[schema]\ncolumns = [{{ name = \"DUT\", type = \"text\" }}, {{ name = \"DUT\", type = \"text\" }}]\n",
            MINIMAL
        );
        assert!(TomlConfig::from_toml_str(&duplicate).unwrap().validate().is_err());

        let bad_format = format!("{}\n[monitoring]\nenabled = false\nlog_format = \"xml\"\n", MINIMAL);
        assert!(TomlConfig::from_toml_str(&bad_format).unwrap().validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = TomlConfig::from_toml_str("[pipeline\nname = ").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }
}
