use std::fmt;

/// A single problem found while building a message from JSON.
///
/// `path` addresses the offending value inside the payload, e.g. `user.addresses[2].city`
/// or `labels.some-key` for a map entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{path}': {message} (expected {expected}, got {actual})")]
pub struct FieldError {
    pub path: String,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }
}

/// Every [`FieldError`] found during a single populate pass.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Wraps the collected errors, or returns `None` when there are none.
    pub(crate) fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// The paths of all offending fields, in the order they were found.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.errors.as_slice() {
            return write!(f, "{single}");
        }

        write!(f, "validation failed with {} errors:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors that prevent a JSON (or binary) payload from becoming a message.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid JSON: '{0}'")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Expected a JSON object for message '{message}', got {actual}")]
    NotAnObject { message: String, actual: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to decode Protobuf bytes: '{0}'")]
    Decode(#[from] prost::DecodeError),
}

impl BuildError {
    /// Returns the field level errors when the payload was well-formed JSON but did not
    /// match the schema.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            BuildError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// Name of a JSON value's dynamic type, as reported in [`FieldError::actual`].
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
