use thiserror::Error;

#[derive(Error, Debug)]
pub enum LuckyDrawError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP status {status}")]
    HttpStatusError { status: u16 },

    #[error("{message}")]
    ServiceError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("At least {required} valid entries are required for the lucky draw.")]
    NotEnoughEntries { required: usize, available: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Data,
    Io,
    Configuration,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LuckyDrawError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::ServiceError { .. } => ErrorCategory::Service,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::NotEnoughEntries { .. } => ErrorCategory::Draw,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Draw => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 網路類錯誤可以等待下一輪刷新重試
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network | ErrorCategory::Service)
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check network connectivity and that the API endpoint is reachable".to_string()
            }
            Self::HttpStatusError { status } if *status == 401 || *status == 403 => {
                "Check the API key and Authorization headers".to_string()
            }
            Self::HttpStatusError { .. } => {
                "The backend rejected the request; it will be retried on the next refresh"
                    .to_string()
            }
            Self::ServiceError { .. } => {
                "The backend reported an error; check the service logs".to_string()
            }
            Self::CsvError(_) => "Check the entries for characters the CSV writer rejects".to_string(),
            Self::ProcessingError { .. } => {
                "Inspect the offending submission rows with --verbose".to_string()
            }
            Self::IoError(_) => "Check that the output path exists and is writable".to_string(),
            Self::SerializationError(_) => {
                "The endpoint must return a JSON array of submissions or a {data, error} envelope"
                    .to_string()
            }
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and try again", field)
            }
            Self::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            Self::NotEnoughEntries { required, available } => format!(
                "Wait for more submissions ({} of {} so far)",
                available, required
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } | Self::SerializationError(_) => {
                "Failed to fetch entries.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LuckyDrawError>;
