//! Configuration for the pattern provider and prompt

use crate::{EasyRegexError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Text placed before the user's query in the prompt
pub const QUERY_START: &str = "from now on only respond in json. the response MUST be formatted in json \
with only the following property: regex. The job to respond to is:  regex find ";

/// Text placed after the selected text in the prompt
pub const QUERY_END: &str = "Remember you must provide only json with a property of regex, \
absolutely no additional text or explanation";

/// Settings for talking to the pattern provider
#[derive(Clone)]
pub struct Config {
    api_key: Option<String>,
    model: String,
    base_url: String,
    query_start: String,
    query_end: String,
    timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            query_start: QUERY_START.to_string(),
            query_end: QUERY_END.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// The API key comes from `OPEN_API_KEY`, falling back to `OPENAI_API_KEY`.
    /// `EASY_REGEX_MODEL`, `OPENAI_BASE_URL` and `EASY_REGEX_TIMEOUT_SECS`
    /// override the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.api_key = get("OPEN_API_KEY").or_else(|| get("OPENAI_API_KEY"));

        if let Some(model) = get("EASY_REGEX_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = get("EASY_REGEX_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                EasyRegexError::Config(format!("EASY_REGEX_TIMEOUT_SECS `{}`: {}", secs, e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the text wrapped around the query and selection in the prompt
    pub fn with_prompt_templates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.query_start = start.into();
        self.query_end = end.into();
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn query_start(&self) -> &str {
        &self.query_start
    }

    pub fn query_end(&self) -> &str {
        &self.query_end
    }
}

// Keep the key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
