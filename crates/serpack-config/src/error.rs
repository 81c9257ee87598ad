//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Config parsing/loading errors
    #[error("config not found in {}", root.display())]
    NotFound { root: PathBuf },

    #[error("unsupported configuration file: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid config value for '{field}'{}", hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // Schema validation errors (no filesystem checks)
    #[error("no entries specified")]
    NoEntries,

    #[error("unknown output format '{0}' (expected 'cjs' or 'esm')")]
    InvalidFormat(String),

    #[error("chunk name template '{template}' uses unknown placeholder '[{placeholder}]'")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("chunk name template '{template}' has an unterminated placeholder")]
    UnterminatedPlaceholder { template: String },

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn schema(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::SchemaValidation {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Remediation hint, when the error carries one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { hint, .. } | Self::SchemaValidation { hint, .. } => {
                hint.as_deref()
            }
            Self::UnknownPlaceholder { .. } | Self::UnterminatedPlaceholder { .. } => {
                Some("Supported placeholders are [id], [index] and [name]")
            }
            Self::InvalidFormat(_) => Some("Use \"cjs\" or \"esm\" in 'formats'"),
            Self::NoEntries => Some("Add at least one [[entries]] table with an alias and a path"),
            _ => None,
        }
    }
}
