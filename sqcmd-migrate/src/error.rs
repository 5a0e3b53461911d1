//! Error types for the migration engine.

use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors raised while rendering migration source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A value has a shape the renderer cannot express as migration source.
    #[error("unsupported option shape at '{path}': {reason}")]
    UnsupportedShape {
        /// Dotted path to the offending value.
        path: String,
        /// Why the value cannot be rendered.
        reason: String,
    },
}

impl RenderError {
    /// Create an unsupported shape error.
    pub fn unsupported(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during migration operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A model definition file could not be parsed.
    #[error("Invalid model definition '{path}': {message}")]
    InvalidModel {
        /// Path of the model file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Requested model is not among the loaded models.
    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    /// Invalid migration file or format.
    #[error("Invalid migration: {0}")]
    InvalidMigration(String),

    /// Migration file already exists.
    #[error("The file {0} already exists. Use --force or -f to overwrite.")]
    AlreadyExists(String),

    /// Snapshot store error.
    #[error("Snapshot store error: {0}")]
    Store(String),

    /// Rendering error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No changes to migrate.
    #[error("No schema changes detected")]
    NoChanges,

    /// General migration error.
    #[error("Migration error: {0}")]
    Other(String),
}

impl MigrationError {
    /// Create an invalid model error.
    pub fn invalid_model(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a migration file error.
    pub fn migration_file(msg: impl Into<String>) -> Self {
        Self::InvalidMigration(msg.into())
    }

    /// Create an other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Check if this is a recoverable error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoChanges | Self::AlreadyExists(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationError::ModelNotFound("User".to_string());
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn test_render_error_display() {
        let err = MigrationError::from(RenderError::unsupported("hooks.beforeCreate", "empty function"));
        let msg = err.to_string();
        assert!(msg.contains("unsupported option shape"));
        assert!(msg.contains("hooks.beforeCreate"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(MigrationError::NoChanges.is_recoverable());
        assert!(MigrationError::AlreadyExists("a.js".to_string()).is_recoverable());
        assert!(!MigrationError::store("disk full").is_recoverable());
    }
}
