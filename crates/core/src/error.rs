use serde::{Deserialize, Serialize};

use crate::text::TextRange;

/// A syntax error. Parsing never stops on one: errors are collected next to
/// a tree that still covers the whole input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseError {
    /// `"lex"` or `"parse"`.
    pub phase: String,
    pub range: TextRange,
    pub message: String,
}

impl ParseError {
    pub fn new(phase: &str, range: TextRange, message: impl Into<String>) -> Self {
        ParseError {
            phase: phase.to_owned(),
            range,
            message: message.into(),
        }
    }

    pub fn lex(range: TextRange, message: impl Into<String>) -> Self {
        ParseError::new("lex", range, message)
    }

    pub fn parse(range: TextRange, message: impl Into<String>) -> Self {
        ParseError::new("parse", range, message)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.message,
            "phase":   self.phase,
            "start":   self.range.start,
            "end":     self.range.end,
        })
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error at {}..{}: {}",
            self.phase, self.range.start, self.range.end, self.message
        )
    }
}

impl std::error::Error for ParseError {}
