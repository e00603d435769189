//! Error types for the easy-regex library

use thiserror::Error;

/// Result type alias for easy-regex operations
pub type Result<T> = std::result::Result<T, EasyRegexError>;

/// Errors that can occur while turning a query into highlighted matches
#[derive(Debug, Error)]
pub enum EasyRegexError {
    /// The pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    /// The provider replied with something that is not a usable pattern
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
    /// The request to the pattern provider failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
    /// No API key was configured for the pattern provider
    #[error("No API key configured; set OPEN_API_KEY or pass --api-key")]
    MissingApiKey,
    /// Nothing was selected
    #[error("You must select something")]
    NoSelection,
    /// The user submitted an empty query
    #[error("A search query is mandatory to execute this action")]
    EmptyQuery,
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A pattern string or its flags failed to compile
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown regex flag `{flag}`")]
    UnknownFlag { flag: char },
}

/// The provider's reply failed validation
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("reply is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("reply is not a JSON object")]
    NotAnObject,
    #[error("reply has no `regex` property")]
    MissingRegex,
    #[error("`regex` property is not a string")]
    RegexNotString,
    #[error("`flags` property is not a string")]
    FlagsNotString,
}

/// Failures talking to the pattern provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("provider returned an empty reply")]
    EmptyReply,
}

impl From<reqwest::Error> for EasyRegexError {
    fn from(err: reqwest::Error) -> Self {
        EasyRegexError::Provider(ProviderError::Http(err))
    }
}
