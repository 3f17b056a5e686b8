//! Error types and exit codes for o2.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const DOCUMENT_NOT_FOUND: i32 = 2;
    pub const PATH_COLLISION: i32 = 3;
    pub const PREFIX_NOT_FOUND: i32 = 4;
    pub const ADAPTER_ERROR: i32 = 5;
    pub const DOCUMENTS_FAILED: i32 = 10;
}

/// Main error type for o2 operations.
#[derive(Error, Debug)]
pub enum O2Error {
    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Destination already exists: {0}")]
    PathCollision(PathBuf),

    #[error("Prefix '{prefix}' does not occur in {path}")]
    PrefixNotFound { path: PathBuf, prefix: String },

    #[error("Site adapter rejected the batch: {0}")]
    AdapterError(String),

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageIo(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl O2Error {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            O2Error::DocumentNotFound(_) => exit_code::DOCUMENT_NOT_FOUND,
            O2Error::PathCollision(_) => exit_code::PATH_COLLISION,
            O2Error::PrefixNotFound { .. } => exit_code::PREFIX_NOT_FOUND,
            O2Error::AdapterError(_) => exit_code::ADAPTER_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Stable machine-readable name of the error, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            O2Error::DocumentNotFound(_) => "document_not_found",
            O2Error::PathCollision(_) => "path_collision",
            O2Error::PrefixNotFound { .. } => "prefix_not_found",
            O2Error::AdapterError(_) => "adapter_error",
            O2Error::StorageIo(_) => "storage_io",
            O2Error::VaultNotFound(_) => "vault_not_found",
            O2Error::ConfigError(_)
            | O2Error::TomlParse(_)
            | O2Error::TomlSerialize(_) => "config_error",
            O2Error::Yaml(_) | O2Error::Json(_) => "serialization_error",
            O2Error::GlobPattern(_) => "glob_pattern",
            O2Error::InvalidDate(_) => "invalid_date",
        }
    }
}

/// Result type alias for o2 operations.
pub type Result<T> = std::result::Result<T, O2Error>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    DocumentNotFound,
    PathCollision,
    PrefixNotFound,
    AdapterError,
    DocumentsFailed,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
            ExitCode::DocumentNotFound => exit_code::DOCUMENT_NOT_FOUND,
            ExitCode::PathCollision => exit_code::PATH_COLLISION,
            ExitCode::PrefixNotFound => exit_code::PREFIX_NOT_FOUND,
            ExitCode::AdapterError => exit_code::ADAPTER_ERROR,
            ExitCode::DocumentsFailed => exit_code::DOCUMENTS_FAILED,
        }
    }
}
