use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Catalog service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Book not found: {id}")]
    NotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Configuration,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ApiError(_) => ErrorCategory::Network,
            CatalogError::ServiceError { .. } | CatalogError::NotFound { .. } => {
                ErrorCategory::Service
            }
            CatalogError::ConfigError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::ValidationError { .. } => ErrorCategory::Data,
            CatalogError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::ApiError(_) => ErrorSeverity::Medium,
            CatalogError::ServiceError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            CatalogError::ServiceError { .. }
            | CatalogError::NotFound { .. }
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::ValidationError { .. } => ErrorSeverity::High,
            CatalogError::ConfigError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::ApiError(e) if e.is_timeout() => {
                "The catalog service did not answer in time".to_string()
            }
            CatalogError::ApiError(_) => "Could not reach the catalog service".to_string(),
            CatalogError::ServiceError { status, message } => {
                format!("The catalog service rejected the request ({}): {}", status, message)
            }
            CatalogError::NotFound { id } => format!("No book with id '{}'", id),
            CatalogError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            CatalogError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the catalog URL, then retry",
            ErrorCategory::Service => "Check the table name, API key and filter values",
            ErrorCategory::Configuration => {
                "Set CATALOG_URL and CATALOG_KEY or pass --url/--key (see --help)"
            }
            ErrorCategory::Data => "The service returned data in an unexpected shape; rerun with -v",
            ErrorCategory::Io => "Check that the output path exists and is writable",
        }
    }

    /// 根據嚴重程度決定 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}
