//! Per-line instruction records and the line framer

use signal_types::{InputToken, SignalConfig, TokenizedLine};
use tracing::debug;

use super::matchers::{Matcher, MATCHERS};
use super::tokens::INFERRED_MARKER;
use crate::config::TranspilerConfig;
use crate::error::{ErrorKind, Field, TranspileError};

/// One line of signal text and the result of applying it.
///
/// A record is applied at most once; later calls to [`apply`](Self::apply)
/// return the stored result without touching the signal again.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionRecord {
    raw: String,
    line_index: usize,
    tokens: TokenizedLine,
    error: Option<TranspileError>,
    matcher: Option<Matcher>,
    applied: bool,
    inferred: bool,
}

impl InstructionRecord {
    /// A line written by the user
    pub fn explicit(raw: impl Into<String>, line_index: usize) -> Self {
        Self::new(raw.into(), line_index, false)
    }

    /// A default synthesized by the inference pass
    pub fn inferred(raw: impl Into<String>, line_index: usize) -> Self {
        Self::new(raw.into(), line_index, true)
    }

    fn new(raw: String, line_index: usize, inferred: bool) -> Self {
        Self {
            raw,
            line_index,
            tokens: Vec::new(),
            error: None,
            matcher: None,
            applied: false,
            inferred,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn tokens(&self) -> &[InputToken] {
        &self.tokens
    }

    pub fn error(&self) -> Option<&TranspileError> {
        self.error.as_ref()
    }

    /// The matcher that claimed this line, once applied
    pub fn matcher(&self) -> Option<Matcher> {
        self.matcher
    }

    /// Field this line tried to set and failed to, other than by repeating it
    pub fn rejected_field(&self) -> Option<Field> {
        match &self.error {
            Some(error) if error.kind() != ErrorKind::DuplicateField => self.matcher?.field(),
            _ => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn is_inferred(&self) -> bool {
        self.inferred
    }

    /// Run the line through the matcher registry, first match wins
    pub fn apply(
        &mut self,
        signal: &mut SignalConfig,
        config: &TranspilerConfig,
    ) -> Option<&TranspileError> {
        if self.applied {
            return self.error.as_ref();
        }
        self.applied = true;

        for matcher in MATCHERS.iter() {
            if let Some(outcome) = matcher.try_apply(&self.raw, signal, config) {
                debug!(
                    line = self.line_index,
                    matcher = matcher.name(),
                    inferred = self.inferred,
                    failed = outcome.error.is_some(),
                    "instruction claimed"
                );
                self.matcher = Some(*matcher);
                self.tokens = outcome.tokens;
                if self.inferred {
                    self.tokens.push(InputToken::comment(INFERRED_MARKER));
                }
                self.error = outcome.error;
                return self.error.as_ref();
            }
        }

        debug!(line = self.line_index, raw = %self.raw, "no matcher claimed line");
        self.error = Some(TranspileError::UnrecognizedInstruction {
            line: self.line_index,
            raw: self.raw.clone(),
        });
        self.error.as_ref()
    }

    /// Tokens for display; a line no matcher claimed renders as one error token
    pub fn rendered(&self) -> TokenizedLine {
        if self.tokens.is_empty() {
            vec![InputToken::error(self.raw.as_str())]
        } else {
            self.tokens.clone()
        }
    }
}

/// Split input into one explicit record per line, in order.
///
/// A trailing `\r` is dropped so CRLF input frames like LF input.
pub fn frame_lines(input: &str) -> Vec<InstructionRecord> {
    input
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            InstructionRecord::explicit(line.strip_suffix('\r').unwrap_or(line), index)
        })
        .collect()
}
