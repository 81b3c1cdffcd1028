use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("No table was extracted from {pages} page(s)")]
    EmptyInput { pages: usize },

    #[error("Table extraction failed on page {page}: {message}")]
    ExtractionError { page: usize, message: String },

    #[error("Pipeline is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Extraction,
    Data,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ExtractionError { .. } | EtlError::EmptyInput { .. } => {
                ErrorCategory::Extraction
            }
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::InvalidState { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Transient storage problems are worth a second attempt.
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorSeverity::Medium,
            EtlError::InvalidState { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::EmptyInput { .. } => {
                "Check that the table extractor ran on the right document; no page produced a table with data rows"
            }
            EtlError::ExtractionError { .. } => {
                "Re-run the table extractor; the source document may be corrupt and should be rejected if it fails again"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command-line flags or the TOML configuration file"
            }
            EtlError::IoError(_) | EtlError::ZipError(_) => {
                "Check that the output directory exists and is writable, then retry"
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Inspect the extracted tables for unexpected content"
            }
            EtlError::ProcessingError { .. } => "Inspect the input data and the target schema",
            EtlError::InvalidState { .. } => "This is a bug; please report it with the log output",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::EmptyInput { pages } => {
                format!("No table found in the document ({} page(s) scanned)", pages)
            }
            EtlError::ExtractionError { page, message } => {
                format!("Could not read the tables of page {}: {}", page, message)
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }

    /// Logs the failure, prints it for the user and returns the exit status.
    pub fn report(&self, context: &str) -> i32 {
        tracing::error!(
            "❌ {}: {} (Category: {:?}, Severity: {:?})",
            context,
            self,
            self.category(),
            self.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());
        eprintln!("❌ {}: {}", context, self.user_friendly_message());
        eprintln!("💡 Suggestion: {}", self.recovery_suggestion());
        self.exit_code()
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

/// Reports `error` and terminates the process with its severity's exit code.
pub fn exit_with(context: &str, error: EtlError) -> ! {
    std::process::exit(error.report(context))
}
