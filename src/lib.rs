//! # easy-regex - Natural-language regex highlighting
//!
//! Describe what you want to match, let a language model write the regex,
//! and get back the positions of every match in document coordinates.
//!
//! ## Usage
//!
//! ```rust
//! use easy_regex::{MatchSpec, Position, TextBlock, locate_matches};
//!
//! # fn main() -> Result<(), easy_regex::PatternError> {
//! // A selection that starts on line 2 of the document
//! let block = TextBlock::new("foo\nbar\nfoo", Position::new(2, 0));
//! let ranges = locate_matches(&block, &MatchSpec::new("foo"))?;
//!
//! assert_eq!(ranges.len(), 2);
//! assert_eq!(ranges[1].start, Position::new(4, 0));
//! # Ok(())
//! # }
//! ```
//!
//! The full command flow (prompting, calling the model, rendering) lives in
//! [`command::EasyRegex`] and runs against any [`command::Host`].

use serde::Serialize;

pub mod command;
pub mod config;
pub mod error;
pub mod locate;
pub mod pattern;
pub mod provider;
pub mod response;

pub use command::{EasyRegex, Host, Outcome};
pub use config::Config;
pub use error::{EasyRegexError, PatternError, ProviderError, ResponseError, Result};
pub use locate::locate_matches;
pub use pattern::MatchSpec;
pub use provider::{OpenAiProvider, PatternProvider};
pub use response::parse_pattern_reply;

/// A 0-based position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Unit in which columns are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnUnit {
    /// Bytes of UTF-8
    Utf8,
    /// UTF-16 code units, as most editors count
    Utf16,
    /// Unicode scalar values
    #[default]
    Utf32,
}

impl ColumnUnit {
    /// Width of `text` in this unit
    pub fn width(self, text: &str) -> usize {
        match self {
            ColumnUnit::Utf8 => text.len(),
            ColumnUnit::Utf16 => text.encode_utf16().count(),
            ColumnUnit::Utf32 => text.chars().count(),
        }
    }

    /// Byte offset of `column` within `line`.
    ///
    /// Columns past the end clamp to `line.len()`. A column that falls
    /// inside a character snaps forward to the next character boundary.
    pub fn byte_offset(self, line: &str, column: usize) -> usize {
        let mut width = 0;
        for (i, ch) in line.char_indices() {
            if width >= column {
                return i;
            }
            width += match self {
                ColumnUnit::Utf8 => ch.len_utf8(),
                ColumnUnit::Utf16 => ch.len_utf16(),
                ColumnUnit::Utf32 => 1,
            };
        }
        line.len()
    }
}

/// Text selected in a document, anchored at the position of its first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    text: String,
    start: Position,
    columns: ColumnUnit,
}

impl TextBlock {
    /// Create a block of `text` whose first character sits at `start`
    pub fn new(text: impl Into<String>, start: Position) -> Self {
        Self {
            text: text.into(),
            start,
            columns: ColumnUnit::default(),
        }
    }

    /// Count columns in `unit` instead of Unicode scalar values
    pub fn with_columns(mut self, unit: ColumnUnit) -> Self {
        self.columns = unit;
        self
    }

    /// Cut the text between `from` and `to` out of `document`.
    ///
    /// Positions are clamped to the document and swapped if inverted.
    pub fn select(document: &str, from: Position, to: Position, unit: ColumnUnit) -> Self {
        let lines = locate::split_lines(document);
        let (from, to) = if to < from { (to, from) } else { (from, to) };

        let resolve = |pos: Position| -> (Position, usize) {
            match lines.get(pos.line) {
                Some(&(offset, line)) => {
                    let byte = unit.byte_offset(line, pos.column);
                    (Position::new(pos.line, unit.width(&line[..byte])), offset + byte)
                }
                None => {
                    // Past the last line: clamp to the end of the document
                    let last = lines.len() - 1;
                    let (offset, line) = lines[last];
                    (Position::new(last, unit.width(line)), offset + line.len())
                }
            }
        };

        let (start, start_byte) = resolve(from);
        let (_, end_byte) = resolve(to);

        Self {
            text: document[start_byte..end_byte].to_string(),
            start,
            columns: unit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Document position of the block's first character
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn columns(&self) -> ColumnUnit {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines of the block without their terminators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        locate::split_lines(&self.text).into_iter().map(|(_, line)| line)
    }
}

/// Location of one match in document coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRange {
    /// Position of the first matched character
    pub start: Position,
    /// Position just past the last matched character
    pub end: Position,
    /// The matched text
    pub text: String,
}

impl MatchRange {
    /// True for zero-length matches
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Width of the match in columns
    pub fn len(&self) -> usize {
        self.end.column - self.start.column
    }
}
