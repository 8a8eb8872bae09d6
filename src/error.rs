use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid dialog state: {0}")]
    DialogState(&'static str),

    #[error("record '{0}' not found")]
    RecordNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(String),
}

impl TabulaError {
    /// True for failures resolved locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, TabulaError::Validation(_))
    }
}

/// Transport failures carry no HTTP status; anything that reached the
/// server and came back non-2xx does.
impl From<reqwest::Error> for TabulaError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => TabulaError::Server {
                status: status.as_u16(),
                message: error.to_string(),
            },
            None => TabulaError::Transport(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for TabulaError {
    fn from(error: serde_json::Error) -> Self {
        TabulaError::MalformedResponse(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabulaError>;
