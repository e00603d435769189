//! Validation of the provider's reply
//!
//! The reply is untrusted text. It must be a JSON object whose `regex`
//! property is a string holding a pattern that compiles.

use crate::{MatchSpec, ResponseError, Result};
use serde_json::Value;

/// Turn a raw provider reply into a compiled-and-checked [`MatchSpec`]
pub fn parse_pattern_reply(reply: &str) -> Result<MatchSpec> {
    let body = strip_code_fence(reply.trim());
    let value: Value = serde_json::from_str(body).map_err(ResponseError::MalformedJson)?;
    let object = value.as_object().ok_or(ResponseError::NotAnObject)?;

    let regex = match object.get("regex") {
        None | Some(Value::Null) => return Err(ResponseError::MissingRegex.into()),
        Some(Value::String(regex)) => regex,
        Some(_) => return Err(ResponseError::RegexNotString.into()),
    };

    let mut spec = MatchSpec::parse(regex)?;
    match object.get("flags") {
        None | Some(Value::Null) => {}
        Some(Value::String(flags)) => spec = spec.with_flags(flags)?,
        Some(_) => return Err(ResponseError::FlagsNotString.into()),
    }

    spec.compile()?;
    Ok(spec)
}

/// Remove a surrounding Markdown code fence such as ```` ```json ... ``` ````
fn strip_code_fence(reply: &str) -> &str {
    let Some(inner) = reply.strip_prefix("```").and_then(|rest| rest.strip_suffix("```")) else {
        return reply;
    };
    // Drop the info string on the opening line
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EasyRegexError, PatternError};

    #[test]
    fn test_plain_object() {
        let spec = parse_pattern_reply(r#"{"regex": "\\d+"}"#).unwrap();
        assert_eq!(spec.pattern(), r"\d+");
    }

    #[test]
    fn test_fenced_reply() {
        let reply = "```json\n{\"regex\": \"[a-z]+\"}\n```";
        assert_eq!(parse_pattern_reply(reply).unwrap().pattern(), "[a-z]+");
    }

    #[test]
    fn test_literal_and_flags_property() {
        let spec = parse_pattern_reply(r#"{"regex": "/abc/g", "flags": "i"}"#).unwrap();
        assert_eq!(spec.pattern(), "abc");
        assert!(spec.flags().case_insensitive);
    }

    #[test]
    fn test_not_json() {
        let err = parse_pattern_reply("Sure! Here is your regex: \\d+").unwrap_err();
        assert!(matches!(err, EasyRegexError::Response(ResponseError::MalformedJson(_))));
    }

    #[test]
    fn test_not_an_object() {
        let err = parse_pattern_reply(r#"["\\d+"]"#).unwrap_err();
        assert!(matches!(err, EasyRegexError::Response(ResponseError::NotAnObject)));
    }

    #[test]
    fn test_missing_regex() {
        let err = parse_pattern_reply(r#"{"pattern": "a"}"#).unwrap_err();
        assert!(matches!(err, EasyRegexError::Response(ResponseError::MissingRegex)));
    }

    #[test]
    fn test_regex_not_string() {
        let err = parse_pattern_reply(r#"{"regex": 42}"#).unwrap_err();
        assert!(matches!(err, EasyRegexError::Response(ResponseError::RegexNotString)));
    }

    #[test]
    fn test_flags_not_string() {
        let err = parse_pattern_reply(r#"{"regex": "a", "flags": true}"#).unwrap_err();
        assert!(matches!(err, EasyRegexError::Response(ResponseError::FlagsNotString)));
    }

    #[test]
    fn test_pattern_must_compile() {
        let err = parse_pattern_reply(r#"{"regex": "(unclosed"}"#).unwrap_err();
        assert!(matches!(err, EasyRegexError::Pattern(PatternError::Invalid { .. })));
    }
}
