// src/error.rs
use thiserror::Error;

/// Failure taxonomy shared by the scrape and predict pipelines.
///
/// Value coercion never produces an error; see `prices::coerce_price`.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or non-success HTTP status.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Expected table / body / row / cell was not in the page.
    #[error("{what} not found in {url}")]
    StructureNotFound { what: String, url: String },

    /// Encoded row columns differ from the model's expected columns
    /// (by name, or only by order when both lists are empty).
    #[error("encoded row does not match model schema (missing: {missing:?}, unexpected: {unexpected:?})")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Category with no indicator column, when strict categories are on.
    #[error("no model column for {field} {value:?}")]
    UnknownCategory { field: String, value: String },

    #[error("model error: {0}")]
    Model(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Error::Fetch { url: s!(url), reason: reason.to_string() }
    }

    pub fn missing(what: &str, url: &str) -> Self {
        Error::StructureNotFound { what: s!(what), url: s!(url) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
