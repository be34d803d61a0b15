//! Error types for pgfrag

use thiserror::Error;

/// Result type alias for pgfrag operations
pub type FragResult<T> = Result<T, FragError>;

/// Error types for fragment building and statement execution
#[derive(Debug, Error)]
pub enum FragError {
    /// Partial update with no fields to change
    #[error("No data")]
    EmptyUpdate,

    /// Filter key outside the entity's declared spec
    #[error("{0} is not a valid filter option")]
    UnknownFilterKey(String),

    /// A min/max filter pair is internally inconsistent
    #[error("{min_key} can not be greater than {max_key}")]
    RangeOrder { min_key: String, max_key: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A caller-supplied value the builders cannot carry
    #[error("Unsupported value: {0}")]
    Unsupported(String),
}

impl FragError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an unknown-filter-key error
    pub fn unknown_filter_key(key: impl Into<String>) -> Self {
        Self::UnknownFilterKey(key.into())
    }

    /// Create a range-order error for a min/max key pair
    pub fn range_order(min_key: impl Into<String>, max_key: impl Into<String>) -> Self {
        Self::RangeOrder {
            min_key: min_key.into(),
            max_key: max_key.into(),
        }
    }

    /// Create an unsupported-value error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this error reports invalid caller input.
    ///
    /// These are deterministic validation failures, detected before any
    /// statement runs; an HTTP-facing caller maps them to a client error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyUpdate | Self::UnknownFilterKey(_) | Self::RangeOrder { .. }
        )
    }

    /// Parse a tokio_postgres error into a more specific FragError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}
