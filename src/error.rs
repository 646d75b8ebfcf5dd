//! Error types for the ORCID client and the mapping engine.

/// Errors that can occur when mapping ORCID documents or talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum OrcidError {
    /// A field transform rejected the value its path resolved to.
    #[error("field `{field}` of {view} could not be mapped from {value}: {source}")]
    FieldTransform {
        view: String,
        field: String,
        value: String,
        #[source]
        source: TransformError,
    },

    /// The view type declares no field with this name.
    #[error("{view} has no field `{field}`")]
    UnknownField { view: String, field: String },

    /// The field was read back as a different type than its transform produces.
    #[error("field `{field}` of {view} is not a {expected}")]
    FieldType {
        view: String,
        field: String,
        expected: &'static str,
    },

    /// Two fields of one view type share a name.
    #[error("{view} declares field `{field}` more than once")]
    DuplicateField { view: String, field: String },

    /// A string that is not an ORCID iD was used to address a record.
    #[error("Invalid ORCID iD: {0:?}")]
    InvalidOrcidId(String),

    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// ORCID API returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to interpret an API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error returned by a field transform.
///
/// Carries only a message; the engine attaches the view, field and raw value
/// when it surfaces the failure as [`OrcidError::FieldTransform`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(String);

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<OrcidError> for TransformError {
    fn from(err: OrcidError) -> Self {
        Self(err.to_string())
    }
}

/// Convenience alias for Results using [`OrcidError`].
pub type Result<T> = std::result::Result<T, OrcidError>;
