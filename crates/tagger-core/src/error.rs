//! Error types for the tagger.

use thiserror::Error;

/// A shared error type for the whole tagger workspace.
///
/// Variants are typed so that the interactive surface can decide how to
/// report each failure (fatal at startup, status line, retry prompt).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaggerError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "CSV"
        message: String,
    },

    /// Configuration error (unreadable or invalid configuration)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A credential is missing or still holds its template placeholder.
    #[error("{service} is not configured: {hint}")]
    Unconfigured {
        service: &'static str,
        hint: String,
    },

    /// Tag name is not part of the taxonomy
    #[error("Unknown tag: '{0}'")]
    InvalidTag(String),

    /// Writing the tagged item file failed
    #[error("Failed to save tagged items: {0}")]
    Persistence(String),

    /// A suggestion request is already outstanding
    #[error("A suggestion request is already in progress")]
    SuggestionInFlight,

    /// The suggestion provider returned an error or a malformed payload
    #[error("Suggestion failed: {0}")]
    Suggestion(String),

    /// HTTP transport or remote API error
    #[error("Network error: {0}")]
    Network(String),
}

impl TaggerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Unconfigured error
    pub fn unconfigured(service: &'static str, hint: impl Into<String>) -> Self {
        Self::Unconfigured {
            service,
            hint: hint.into(),
        }
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a Suggestion error
    pub fn suggestion(message: impl Into<String>) -> Self {
        Self::Suggestion(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidTag error
    pub fn is_invalid_tag(&self) -> bool {
        matches!(self, Self::InvalidTag(_))
    }

    /// Check if this is a Persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this error was caused by missing or placeholder credentials
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TaggerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TaggerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TaggerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TaggerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for TaggerError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            return Self::Io {
                message: format!("{} (kind: {:?})", io_err, io_err.kind()),
            };
        }
        Self::Serialization {
            format: "CSV".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TaggerError>`.
pub type Result<T> = std::result::Result<T, TaggerError>;
