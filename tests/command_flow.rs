//! Integration tests for the highlight command

use easy_regex::command::{self, Host};
use easy_regex::{
    Config, EasyRegex, EasyRegexError, MatchRange, Outcome, PatternProvider, Position,
    ProviderError, ResponseError, Result, TextBlock,
};
use std::sync::Mutex;

/// Host that records everything the command shows it
#[derive(Default)]
struct RecordingHost {
    block: Option<TextBlock>,
    answer: Option<String>,
    infos: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    rendered: Option<Vec<MatchRange>>,
}

impl RecordingHost {
    fn new(block: TextBlock, answer: &str) -> Self {
        Self {
            block: Some(block),
            answer: Some(answer.to_string()),
            ..Default::default()
        }
    }
}

impl Host for RecordingHost {
    fn selected_block(&mut self) -> Option<TextBlock> {
        self.block.clone()
    }

    fn ask(&mut self, _prompt: &str, _placeholder: &str) -> Option<String> {
        self.answer.take()
    }

    fn show_info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn show_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn render_ranges(&mut self, ranges: &[MatchRange]) {
        self.rendered = Some(ranges.to_vec());
    }
}

/// Provider that always gives the same reply
struct CannedProvider {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl CannedProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl PatternProvider for CannedProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

impl PatternProvider for &CannedProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

struct FailingProvider;

impl PatternProvider for FailingProvider {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(ProviderError::EmptyReply.into())
    }
}

fn spans(ranges: &[MatchRange]) -> Vec<(usize, usize, usize, usize)> {
    ranges
        .iter()
        .map(|r| (r.start.line, r.start.column, r.end.line, r.end.column))
        .collect()
}

#[tokio::test(flavor = "current_thread")]
async fn test_query_is_turned_into_highlights() {
    let provider = CannedProvider::new(r#"{"regex": "\\d+"}"#);
    let app = EasyRegex::new(Config::default(), &provider);
    let mut host = RecordingHost::new(TextBlock::new("abc123", Position::new(0, 5)), "numbers");

    let outcome = app.run(&mut host).await.expect("command should succeed");

    let Outcome::Highlighted { spec, ranges } = outcome else {
        panic!("expected highlights");
    };
    assert_eq!(spec.pattern(), r"\d+");
    assert_eq!(spans(&ranges), vec![(0, 8, 0, 11)]);
    assert_eq!(host.rendered, Some(ranges));
    assert_eq!(host.infos, vec!["Searching for numbers...".to_string(), r"\d+".to_string()]);
    assert!(host.errors.is_empty());
    assert!(host.warnings.is_empty());

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("numbers in this string 'abc123'"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_selection() {
    let provider = CannedProvider::new(r#"{"regex": "a"}"#);
    let app = EasyRegex::new(Config::default(), &provider);
    let mut host = RecordingHost::default();

    let err = app.run(&mut host).await.unwrap_err();

    assert!(matches!(err, EasyRegexError::NoSelection));
    assert_eq!(host.errors, vec!["You must select something".to_string()]);
    assert!(provider.prompts().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_empty_selection() {
    let app = EasyRegex::new(Config::default(), CannedProvider::new(r#"{"regex": "a"}"#));
    let mut host = RecordingHost::new(TextBlock::new("", Position::default()), "anything");

    let err = app.run(&mut host).await.unwrap_err();
    assert!(matches!(err, EasyRegexError::NoSelection));
}

#[tokio::test(flavor = "current_thread")]
async fn test_dismissed_prompt_cancels() {
    let app = EasyRegex::new(Config::default(), CannedProvider::new(r#"{"regex": "a"}"#));
    let mut host = RecordingHost {
        block: Some(TextBlock::new("aaa", Position::default())),
        ..Default::default()
    };

    let outcome = app.run(&mut host).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(host.rendered.is_none());
    assert!(host.errors.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_empty_query() {
    let app = EasyRegex::new(Config::default(), CannedProvider::new(r#"{"regex": "a"}"#));
    let mut host = RecordingHost::new(TextBlock::new("aaa", Position::default()), "   ");

    let err = app.run(&mut host).await.unwrap_err();

    assert!(matches!(err, EasyRegexError::EmptyQuery));
    assert_eq!(
        host.errors,
        vec!["A search query is mandatory to execute this action".to_string()]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_malformed_reply_is_reported() {
    let app = EasyRegex::new(
        Config::default(),
        CannedProvider::new("Here you go: /\\d+/"),
    );
    let mut host = RecordingHost::new(TextBlock::new("a1", Position::default()), "digits");

    let err = app.run(&mut host).await.unwrap_err();

    assert!(matches!(err, EasyRegexError::Response(ResponseError::MalformedJson(_))));
    assert_eq!(host.errors.len(), 1);
    assert!(host.rendered.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn test_invalid_pattern_in_reply() {
    let app = EasyRegex::new(Config::default(), CannedProvider::new(r#"{"regex": "("}"#));
    let mut host = RecordingHost::new(TextBlock::new("(a)", Position::default()), "parens");

    let err = app.run(&mut host).await.unwrap_err();

    assert!(matches!(err, EasyRegexError::Pattern(_)));
    assert!(host.rendered.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn test_provider_failure_is_reported() {
    let app = EasyRegex::new(Config::default(), FailingProvider);
    let mut host = RecordingHost::new(TextBlock::new("abc", Position::default()), "letters");

    let err = app.run(&mut host).await.unwrap_err();

    assert!(matches!(err, EasyRegexError::Provider(ProviderError::EmptyReply)));
    assert_eq!(host.errors, vec![err.to_string()]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_no_matches_warns() {
    let app = EasyRegex::new(Config::default(), CannedProvider::new(r#"{"regex": "\\d"}"#));
    let mut host = RecordingHost::new(TextBlock::new("letters only", Position::default()), "digits");

    let outcome = app.run(&mut host).await.unwrap();

    assert!(matches!(outcome, Outcome::Highlighted { ref ranges, .. } if ranges.is_empty()));
    assert_eq!(host.rendered, Some(Vec::new()));
    assert_eq!(host.warnings.len(), 1);
    assert!(host.warnings[0].contains("\"digits\""));
}

#[test]
fn test_pattern_without_provider() {
    let mut host = RecordingHost {
        block: Some(TextBlock::new("foo\nbar\nfoo", Position::new(2, 0))),
        ..Default::default()
    };

    let outcome = command::run_with_pattern(&mut host, "foo").unwrap();

    let Outcome::Highlighted { ranges, .. } = outcome else {
        panic!("expected highlights");
    };
    assert_eq!(spans(&ranges), vec![(2, 0, 2, 3), (4, 0, 4, 3)]);
}

#[test]
fn test_pattern_literal_with_flags() {
    let mut host = RecordingHost {
        block: Some(TextBlock::new("Error error ERROR", Position::default())),
        ..Default::default()
    };

    let outcome = command::run_with_pattern(&mut host, "/error/gi").unwrap();
    assert!(matches!(outcome, Outcome::Highlighted { ref ranges, .. } if ranges.len() == 3));
}

#[test]
fn test_invalid_pattern_without_provider() {
    let mut host = RecordingHost {
        block: Some(TextBlock::new("abc", Position::default())),
        ..Default::default()
    };

    let err = command::run_with_pattern(&mut host, "(").unwrap_err();

    assert!(matches!(err, EasyRegexError::Pattern(_)));
    assert_eq!(host.errors.len(), 1);
    assert!(host.rendered.is_none());
}

#[test]
fn test_repeated_runs_agree() {
    let provider = CannedProvider::new(r#"{"regex": "o+"}"#);
    let app = EasyRegex::new(Config::default(), &provider);
    let block = TextBlock::new("foo\nboo\nzoom", Position::new(1, 4));

    let mut first = RecordingHost::new(block.clone(), "runs of o");
    let mut second = RecordingHost::new(block, "runs of o");
    let first = tokio_test::assert_ok!(tokio_test::block_on(app.run(&mut first)));
    let second = tokio_test::assert_ok!(tokio_test::block_on(app.run(&mut second)));

    assert_eq!(first, second);
    assert_eq!(provider.prompts().len(), 2);

    let Outcome::Highlighted { ranges, .. } = first else {
        panic!("expected highlights");
    };
    assert_eq!(spans(&ranges), vec![(1, 5, 1, 7), (2, 1, 2, 3), (3, 1, 3, 3)]);
}
