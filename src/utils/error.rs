use crate::core::projector::ProjectionConflict;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed input at record {record}: {source}")]
    MalformedInputError {
        record: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Projection conflict: {0}")]
    ProjectionConflictError(#[from] ProjectionConflict),

    #[error("Invalid field path '{path}': {reason}")]
    InvalidFieldPathError { path: String, reason: String },

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Projection,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MalformedInputError { .. } | EtlError::ProcessingError { .. } => {
                ErrorCategory::Input
            }
            EtlError::ProjectionConflictError(_) => ErrorCategory::Projection,
            EtlError::InvalidFieldPathError { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ProjectionConflictError(_) => ErrorSeverity::Medium,
            EtlError::MalformedInputError { .. }
            | EtlError::ProcessingError { .. }
            | EtlError::InvalidFieldPathError { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MalformedInputError { .. } => {
                "Check that the input is valid JSON, or rerun with --lines --skip-malformed to skip bad lines"
            }
            EtlError::ProjectionConflictError(_) => {
                "Remove the conflicting field path, or drop --strict to keep the first-seen value"
            }
            EtlError::InvalidFieldPathError { .. } => {
                "Field paths are dot separated names without empty segments, e.g. referenced_tweets.author.username"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Review the command line options and the config file",
            EtlError::ProcessingError { .. } => {
                "Read CSV input from a file, or let the tool buffer stdin before the header pass"
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                "Check that the input exists and the output location is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MalformedInputError { record, .. } => {
                format!("Input record {} is not valid JSON", record)
            }
            EtlError::ProjectionConflictError(conflict) => {
                format!("Field selection conflict: {}", conflict)
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
