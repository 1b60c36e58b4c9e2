//! Token construction helpers shared by the matchers

use signal_types::{InputToken, TokenizedLine};

/// Marker appended to instructions synthesized by the inference pass
pub const INFERRED_MARKER: &str = " // INFERRED";

/// Fluent builder for one rendered line
#[derive(Debug, Default)]
pub(crate) struct LineTokens {
    tokens: TokenizedLine,
}

impl LineTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// `KEYWORD: ` prefix used by most instructions
    pub fn labelled(keyword: &str) -> Self {
        Self::new().instruction(keyword).punctuation(": ")
    }

    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(InputToken::instruction(text));
        self
    }

    pub fn punctuation(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(InputToken::punctuation(text));
        self
    }

    pub fn expression(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(InputToken::expression(text));
        self
    }

    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.tokens.push(InputToken::error(text));
        self
    }

    /// Append the trailing `//...` comment, preceded by a space, when present
    pub fn comment(mut self, comment: Option<&str>) -> Self {
        if let Some(comment) = comment {
            self.tokens.push(InputToken::punctuation(" "));
            self.tokens.push(InputToken::comment(comment));
        }
        self
    }

    pub fn build(self) -> TokenizedLine {
        self.tokens
    }
}

/// The whole raw line as a single error token
pub(crate) fn error_line(raw: &str) -> TokenizedLine {
    vec![InputToken::error(raw)]
}

/// Shortest decimal rendering, without exponent or trailing zeros
pub fn format_float(value: f64) -> String {
    format!("{}", value)
}
