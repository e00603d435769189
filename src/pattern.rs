//! Regex patterns and their flags

use crate::PatternError;
use regex::{Regex, RegexBuilder};

/// Flags recognised on a pattern, written the way JavaScript writes them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl Flags {
    /// Turn on every flag named in `letters`.
    ///
    /// `g` and `u` are accepted but change nothing: matching is always
    /// global and always Unicode-aware.
    pub fn apply(&mut self, letters: &str) -> Result<(), PatternError> {
        for flag in letters.chars() {
            match flag {
                'g' | 'u' => {}
                'i' => self.case_insensitive = true,
                'm' => self.multi_line = true,
                's' => self.dot_matches_new_line = true,
                'x' => self.ignore_whitespace = true,
                _ => return Err(PatternError::UnknownFlag { flag }),
            }
        }
        Ok(())
    }
}

/// A pattern to search for, plus its flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpec {
    pattern: String,
    flags: Flags,
}

impl MatchSpec {
    /// A bare pattern with no flags
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: Flags::default(),
        }
    }

    /// Accept either a bare pattern or a `/pattern/flags` literal
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if let Some((pattern, flags)) = split_literal(source) {
            Self::new(pattern).with_flags(flags)
        } else {
            Ok(Self::new(source))
        }
    }

    /// Add the flags named in `letters` to this spec
    pub fn with_flags(mut self, letters: &str) -> Result<Self, PatternError> {
        self.flags.apply(letters)?;
        Ok(self)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Compile the pattern with its flags applied
    pub fn compile(&self) -> Result<Regex, PatternError> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(self.flags.case_insensitive)
            .multi_line(self.flags.multi_line)
            .dot_matches_new_line(self.flags.dot_matches_new_line)
            .ignore_whitespace(self.flags.ignore_whitespace)
            .build()
            .map_err(|source| PatternError::Invalid {
                pattern: self.pattern.clone(),
                source,
            })
    }
}

/// Split `/body/flags` into its body and flag letters
fn split_literal(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if body.is_empty() || !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((body, flags))
}
