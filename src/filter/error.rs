use thiserror::Error;

/// Errors that can occur when parsing, validating or applying filters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Wrong input format '{0}'. Please use --filter filter_name=filter_value")]
    MalformedFilter(String),

    #[error("Filter '{key}' is not valid. Available filters are: {available}")]
    UnknownFilterKey { key: String, available: String },

    #[error("Input {key} value '{value}' is not valid. Accepted values are: {accepted}")]
    InvalidFilterValue {
        key: String,
        value: String,
        accepted: String,
    },

    #[error("Filter '{key}' is not a {expected}-valued filter")]
    WrongArity { key: String, expected: &'static str },

    #[error("Failed to encode search filter: {0}")]
    SearchEncoding(String),

    #[error("no {0} matching filter criteria")]
    EmptyResult(String),
}

/// Requested filter values that matched nothing in the response.
///
/// This is a warning, not an error: the command still displays whatever did match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMatch {
    pub key: String,
    pub missing: Vec<String>,
}

impl std::fmt::Display for PartialMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no results found for {} value(s): {}",
            self.key,
            self.missing.join(",")
        )
    }
}
