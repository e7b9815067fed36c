//! Error types for rowbind

use thiserror::Error;

/// Result type alias for rowbind operations
pub type BindResult<T> = Result<T, BindError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum BindError {
    /// Entity identifier could not be resolved by the metadata provider
    #[error("Metadata error for entity '{entity}': {message}")]
    Metadata { entity: String, message: String },

    /// Field mapping declares a logical type outside the supported set
    #[error("Type {0} not found")]
    UnsupportedType(String),

    /// Invalid identifier or malformed metadata document
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration or metadata file could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Statement execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// NOT NULL constraint violation
    #[error("Not null violation: {0}")]
    NotNullViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),
}

impl BindError {
    /// Create a metadata error for an entity
    pub fn metadata(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metadata {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-entity metadata error
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::metadata(entity, "entity is not registered")
    }

    /// Create an unsupported type error
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType(type_name.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this is a metadata resolution error
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Whether this is an unsupported type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType(_))
    }

    /// Classify a driver error by SQLSTATE.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{constraint}: {message}")),
                "23503" => return Self::ForeignKeyViolation(format!("{constraint}: {message}")),
                "23502" => {
                    let column = db_err.column().unwrap_or("unknown");
                    return Self::NotNullViolation(format!("{column}: {message}"));
                }
                "23514" => return Self::CheckViolation(format!("{constraint}: {message}")),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_the_type() {
        let err = BindError::unsupported_type("json");
        assert!(err.is_unsupported_type());
        assert_eq!(err.to_string(), "Type json not found");
    }

    #[test]
    fn metadata_error_display() {
        let err = BindError::unknown_entity("Article");
        assert!(err.is_metadata());
        assert_eq!(
            err.to_string(),
            "Metadata error for entity 'Article': entity is not registered"
        );
    }
}
