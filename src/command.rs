//! The highlight command: selection, query, pattern, matches

use crate::provider::{PatternProvider, build_prompt};
use crate::{Config, EasyRegexError, MatchRange, MatchSpec, Result, TextBlock};
use crate::{locate_matches, parse_pattern_reply};

pub const QUERY_PROMPT: &str = "Enter Search Query";
pub const QUERY_PLACEHOLDER: &str = "What are you trying to match?";

/// Capabilities the command needs from whatever is hosting it (an editor,
/// a terminal, a test)
pub trait Host {
    /// The current selection, if any
    fn selected_block(&mut self) -> Option<TextBlock>;
    /// Ask the user for a line of input; `None` means the prompt was dismissed
    fn ask(&mut self, prompt: &str, placeholder: &str) -> Option<String>;
    fn show_info(&mut self, message: &str);
    fn show_warning(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
    /// Mark the given ranges in the document
    fn render_ranges(&mut self, ranges: &[MatchRange]);
}

/// How a command run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user dismissed the query prompt
    Cancelled,
    /// A pattern was applied and its matches rendered
    Highlighted {
        spec: MatchSpec,
        ranges: Vec<MatchRange>,
    },
}

/// Runs the highlight command against a [`PatternProvider`]
pub struct EasyRegex<P> {
    config: Config,
    provider: P,
}

impl<P: PatternProvider> EasyRegex<P> {
    pub fn new(config: Config, provider: P) -> Self {
        Self { config, provider }
    }

    /// Ask for a query, have the provider turn it into a pattern, and
    /// highlight its matches in the selection.
    ///
    /// Failures are shown through [`Host::show_error`] before being returned.
    pub async fn run<H: Host>(&self, host: &mut H) -> Result<Outcome> {
        let result = self.query_and_highlight(host).await;
        report(host, result)
    }

    async fn query_and_highlight<H: Host>(&self, host: &mut H) -> Result<Outcome> {
        let block = selection(host)?;

        let Some(query) = host.ask(QUERY_PROMPT, QUERY_PLACEHOLDER) else {
            tracing::debug!("query prompt dismissed");
            return Ok(Outcome::Cancelled);
        };
        let query = query.trim();
        if query.is_empty() {
            return Err(EasyRegexError::EmptyQuery);
        }

        host.show_info(&format!("Searching for {}...", query));

        let prompt = build_prompt(&self.config, query, block.text());
        tracing::debug!(prompt_len = prompt.len(), "requesting pattern");

        let reply = self.provider.complete(&prompt).await?;
        let spec = parse_pattern_reply(&reply).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected provider reply");
        })?;

        tracing::info!(pattern = spec.pattern(), "received pattern");
        host.show_info(spec.pattern());

        highlight(host, &block, spec, query)
    }
}

/// Highlight matches of a pattern the user already has, skipping the provider
pub fn run_with_pattern<H: Host>(host: &mut H, pattern: &str) -> Result<Outcome> {
    let result = selection(host).and_then(|block| {
        let spec = MatchSpec::parse(pattern)?;
        highlight(host, &block, spec, pattern)
    });
    report(host, result)
}

fn selection<H: Host>(host: &mut H) -> Result<TextBlock> {
    host.selected_block()
        .filter(|block| !block.is_empty())
        .ok_or(EasyRegexError::NoSelection)
}

fn highlight<H: Host>(host: &mut H, block: &TextBlock, spec: MatchSpec, label: &str) -> Result<Outcome> {
    let ranges = locate_matches(block, &spec)?;
    tracing::debug!(matches = ranges.len(), "located matches");

    if ranges.is_empty() {
        host.show_warning(&format!(
            "Did not find a result for \"{}\". Please try again or update the query and try again.",
            label
        ));
    }
    host.render_ranges(&ranges);

    Ok(Outcome::Highlighted { spec, ranges })
}

fn report<H: Host, T>(host: &mut H, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        host.show_error(&e.to_string());
    }
    result
}
