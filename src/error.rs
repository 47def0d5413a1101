// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Shown in place of the reply whenever an exchange fails, whatever the cause.
pub const APOLOGY: &str = "Sorry, something went wrong.";

/// Everything that can go wrong between issuing a request and reading its
/// reply. The user never sees these; every variant renders as [`APOLOGY`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("endpoint answered with status {0}")]
    Status(StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no `reply` field")]
    MissingReply,

    #[error("exchange abandoned: {0}")]
    Closed(String),
}

impl ChatError {
    pub fn user_message(&self) -> &'static str {
        APOLOGY
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint url {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("customer id must not be empty")]
    EmptyCustomerId,
}
