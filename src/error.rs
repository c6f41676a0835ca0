use thiserror::Error;

/// Input errors detected while building a request. None of these reach the
/// network; they are shown to the user as a rejected outcome.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("missing required path parameter(s) {missing:?} in {url}")]
    MissingPathParameter { url: String, missing: Vec<String> },

    #[error("request body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("server index {index} is out of range ({count} server(s) defined)")]
    ServerIndexOutOfRange { index: usize, count: usize },

    #[error("operation defines no server and no host is configured")]
    NoServer,

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid path parameter delimiters: {0}")]
    InvalidDelimiters(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
