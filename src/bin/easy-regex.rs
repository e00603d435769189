use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use easy_regex::command::{self, Host};
use easy_regex::{ColumnUnit, Config, EasyRegex, MatchRange, OpenAiProvider, Position, TextBlock};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{self, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Columns {
    #[value(name = "utf8")]
    Utf8,
    #[value(name = "utf16")]
    Utf16,
    #[value(name = "utf32")]
    Utf32,
}

impl From<Columns> for ColumnUnit {
    fn from(columns: Columns) -> Self {
        match columns {
            Columns::Utf8 => ColumnUnit::Utf8,
            Columns::Utf16 => ColumnUnit::Utf16,
            Columns::Utf32 => ColumnUnit::Utf32,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "easy-regex",
    version,
    about = "Describe what you want to match, get a regex, see it highlighted",
    long_about = r#"
Describe what you want to match, get a regex, see it highlighted

The selected text and your query are sent to an OpenAI-compatible chat
completion API, which answers with a regex. Every match in the selection is
then highlighted.

Examples:
  easy-regex notes.txt --query "dates"              # Whole file, ask the model
  easy-regex main.rs --from 10:1 --to 20:1          # Lines 10-19, prompt for a query
  cat log.txt | easy-regex --pattern '/error/i'     # Skip the model entirely
  easy-regex data.csv -q "emails" --json            # Print ranges as JSON

Environment:
  OPEN_API_KEY / OPENAI_API_KEY   API key for the pattern provider
  EASY_REGEX_MODEL                Model name (default gpt-3.5-turbo)
  OPENAI_BASE_URL                 API base URL
  EASY_REGEX_TIMEOUT_SECS         Request timeout
  RUST_LOG                        Log filter (logs go to stderr)
"#
)]
struct Args {
    /// Document to search; reads stdin when omitted
    file: Option<PathBuf>,

    /// Start of the selection as LINE:COL, 1-based (default: start of document)
    #[arg(long, value_parser = parse_position)]
    from: Option<Position>,

    /// End of the selection as LINE:COL, 1-based and exclusive (default: end of document)
    #[arg(long, value_parser = parse_position)]
    to: Option<Position>,

    /// What you are trying to match; prompted for when omitted
    #[arg(long, short)]
    query: Option<String>,

    /// Use this regex instead of asking the model
    #[arg(long, short, conflicts_with = "query")]
    pattern: Option<String>,

    /// Model to ask for the pattern
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the chat completion API
    #[arg(long)]
    base_url: Option<String>,

    /// API key (overrides OPEN_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Unit used to count columns
    #[arg(long, value_enum, default_value = "utf32")]
    columns: Columns,

    /// Print the match ranges as JSON instead of the highlighted text
    #[arg(long)]
    json: bool,
}

/// Parse `LINE[:COL]` (1-based) into a 0-based position
fn parse_position(value: &str) -> std::result::Result<Position, String> {
    let (line, column) = value.split_once(':').unwrap_or((value, "1"));
    let parse = |part: &str, what: &str| -> std::result::Result<usize, String> {
        match part.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("{} must be a number starting at 1, got `{}`", what, part)),
        }
    };
    Ok(Position::new(parse(line, "line")?, parse(column, "column")?))
}

/// Host that reads from the terminal and prints highlighted lines
struct TerminalHost {
    block: TextBlock,
    query: Option<String>,
    interactive: bool,
    json: bool,
    color: bool,
}

impl Host for TerminalHost {
    fn selected_block(&mut self) -> Option<TextBlock> {
        Some(self.block.clone())
    }

    fn ask(&mut self, prompt: &str, placeholder: &str) -> Option<String> {
        if let Some(query) = self.query.take() {
            return Some(query);
        }
        if !self.interactive {
            return None;
        }

        eprint!("{} ({}): ", prompt, placeholder);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(answer.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn show_info(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn show_warning(&mut self, message: &str) {
        eprintln!("warning: {}", message);
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn render_ranges(&mut self, ranges: &[MatchRange]) {
        if self.json {
            match serde_json::to_string_pretty(ranges) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("error: {}", e),
            }
        } else {
            self.render_text(ranges);
            eprintln!("{} match(es)", ranges.len());
        }
    }
}

impl TerminalHost {
    fn render_text(&self, ranges: &[MatchRange]) {
        let anchor = self.block.start();
        let unit = self.block.columns();

        for (index, line) in self.block.lines().enumerate() {
            let line_number = anchor.line + index;
            let base = if index == 0 { anchor.column } else { 0 };

            let mut rendered = String::new();
            let mut cursor = 0;
            for range in ranges
                .iter()
                .filter(|r| r.start.line == line_number && !r.is_empty())
            {
                let start = unit.byte_offset(line, range.start.column - base);
                let end = unit.byte_offset(line, range.end.column - base);
                rendered.push_str(&line[cursor..start]);
                if self.color {
                    // Green background, like the editor decoration
                    rendered.push_str(&format!("\x1b[42m{}\x1b[0m", &line[start..end]));
                } else {
                    rendered.push_str(&format!("[{}]", &line[start..end]));
                }
                cursor = end;
            }
            rendered.push_str(&line[cursor..]);

            println!("{:>5} | {}", line_number + 1, rendered);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match run(Args::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        // The host already reported the failure
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    let (document, from_stdin) = match &args.file {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (document, false)
        }
        None => {
            let mut document = String::new();
            io::stdin()
                .read_to_string(&mut document)
                .context("Failed to read document from stdin")?;
            (document, true)
        }
    };

    if from_stdin && args.query.is_none() && args.pattern.is_none() {
        bail!("--query or --pattern is required when the document is read from stdin");
    }

    let from = args.from.unwrap_or_default();
    let to = args.to.unwrap_or(Position::new(usize::MAX, 0));
    let block = TextBlock::select(&document, from, to, args.columns.into());
    tracing::debug!(start = ?block.start(), len = block.text().len(), "selected block");

    let mut host = TerminalHost {
        block,
        query: args.query.clone(),
        interactive: !from_stdin,
        json: args.json,
        color: io::stdout().is_terminal(),
    };

    let outcome = match &args.pattern {
        Some(pattern) => command::run_with_pattern(&mut host, pattern),
        None => {
            let mut config = Config::from_env()?;
            if let Some(key) = args.api_key {
                config = config.with_api_key(key);
            }
            if let Some(model) = args.model {
                config = config.with_model(model);
            }
            if let Some(base_url) = args.base_url {
                config = config.with_base_url(base_url);
            }

            let provider = OpenAiProvider::new(&config)?;
            EasyRegex::new(config, provider).run(&mut host).await
        }
    };

    Ok(outcome.is_ok())
}
