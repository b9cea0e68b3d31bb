use std::{
    fmt::{Debug, Display},
    io,
};

use thiserror::Error;

/// Reasons a frontmatter mapping is rejected by [`crate::metadata::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field `{field}` is not an ISO date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::InvalidDate { field, .. } => field,
        }
    }
}

pub enum BlogErr {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Url(url::ParseError),
    Join(tokio::task::JoinError),
    Validation(ValidationError),
    Message(String),
    Context { context: String, source: Box<BlogErr> },
}

impl From<io::Error> for BlogErr {
    fn from(err: io::Error) -> Self {
        BlogErr::Io(err)
    }
}

impl From<serde_yaml::Error> for BlogErr {
    fn from(err: serde_yaml::Error) -> Self {
        BlogErr::Yaml(err)
    }
}

impl From<serde_json::Error> for BlogErr {
    fn from(err: serde_json::Error) -> Self {
        BlogErr::Json(err)
    }
}

impl From<url::ParseError> for BlogErr {
    fn from(err: url::ParseError) -> Self {
        BlogErr::Url(err)
    }
}

impl From<tokio::task::JoinError> for BlogErr {
    fn from(err: tokio::task::JoinError) -> Self {
        BlogErr::Join(err)
    }
}

impl From<ValidationError> for BlogErr {
    fn from(err: ValidationError) -> Self {
        BlogErr::Validation(err)
    }
}

impl From<String> for BlogErr {
    fn from(msg: String) -> Self {
        BlogErr::Message(msg)
    }
}

impl From<&str> for BlogErr {
    fn from(msg: &str) -> Self {
        BlogErr::Message(msg.to_string())
    }
}

impl Display for BlogErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogErr::Io(err) => write!(f, "IO error:\n {err}"),
            BlogErr::Yaml(err) => write!(f, "YAML not valid:\n {err}"),
            BlogErr::Json(err) => write!(f, "JSON error:\n {err}"),
            BlogErr::Url(err) => write!(f, "URL not valid:\n {err}"),
            BlogErr::Join(err) => write!(f, "Task failed:\n {err}"),
            BlogErr::Validation(err) => write!(f, "Frontmatter not valid:\n {err}"),
            BlogErr::Message(msg) => write!(f, "{msg}"),
            BlogErr::Context { context, source } => write!(f, "{context}\n{source}"),
        }
    }
}

impl Debug for BlogErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for BlogErr {}

pub trait ContextExt<T> {
    fn with_context<F, S>(self, context: F) -> Result<T, BlogErr>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<BlogErr>> ContextExt<T> for Result<T, E> {
    fn with_context<F, S>(self, context: F) -> Result<T, BlogErr>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|err| BlogErr::Context {
            context: context().into(),
            source: Box::new(err.into()),
        })
    }
}
