//! Error types for relmap

use thiserror::Error;

/// Result type alias for relmap operations
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised while building a schema map, sorting entities or translating paths.
///
/// Every variant carries an owned message so results (including failures) can be
/// memoized and handed to several callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Malformed builder or descriptor input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A referenced entity, attribute or relationship does not exist
    #[error("Schema resolution error: {0}")]
    SchemaResolution(String),

    /// Syntactically degenerate path input
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A well-formed path that cannot be resolved against the schema
    #[error("Path resolution error: {0}")]
    PathResolution(String),

    /// An operation was invoked before the required setup
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Rows of a self-referencing table depend on each other in a cycle
    #[error("Row cycle: {0}")]
    RowCycle(String),

    /// Descriptor (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn schema_resolution(message: impl Into<String>) -> Self {
        Self::SchemaResolution(message.into())
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn path_resolution(message: impl Into<String>) -> Self {
        Self::PathResolution(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Check if this is a schema resolution error
    pub fn is_schema_resolution(&self) -> bool {
        matches!(self, Self::SchemaResolution(_))
    }

    /// Check if this is a path resolution error
    pub fn is_path_resolution(&self) -> bool {
        matches!(self, Self::PathResolution(_))
    }

    /// Check if this is an invalid path error
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath(_))
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
