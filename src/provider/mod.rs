//! Sources of regex patterns generated from natural language

use crate::{Config, Result};
use std::future::Future;

mod openai;

pub use openai::OpenAiProvider;

/// Something that answers a prompt with text, typically a language model
pub trait PatternProvider {
    /// Send `prompt` and return the raw reply
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Build the prompt asking for a regex that finds `query` within `text`
pub fn build_prompt(config: &Config, query: &str, text: &str) -> String {
    format!(
        "{}{} in this string '{}'. {}",
        config.query_start(),
        query,
        text,
        config.query_end()
    )
}
