//! Error handling for the signal transpiler
//!
//! Every per-line failure is a `TranspileError`. Its `Display` output is the
//! human-readable string collected into the transpiler output, so each message
//! must stand on its own without the surrounding report.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Signal fields guarded by the single-assignment rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Market,
    EnterRange,
    StopLoss,
    Exchange,
    StartAt,
    ShortLong,
    InvalidateAfter,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Market => "market",
            Field::EnterRange => "enter range",
            Field::StopLoss => "stop loss",
            Field::Exchange => "exchange",
            Field::StartAt => "'start at'",
            Field::ShortLong => "short/long",
            Field::InvalidateAfter => "timeout after days",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad classes of transpile failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No matcher claimed a non-blank line
    Unrecognized,
    /// A field was already set by an earlier instruction
    DuplicateField,
    /// A number, integer or date failed to parse
    MalformedValue,
    /// A value parsed but is outside the allowed bounds
    SemanticRange,
    /// A required field is still unset after every pass
    MissingRequired,
}

/// A recoverable failure attached to one line or to the whole signal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranspileError {
    #[error("unrecognized instruction at line {line} with content [{raw}]")]
    UnrecognizedInstruction { line: usize, raw: String },

    #[error("{field} already supplied [{raw}]")]
    AlreadySupplied { field: Field, raw: String },

    #[error("malformed float with content {content}")]
    MalformedFloat { content: String },

    #[error("malformed integer [{value}]")]
    MalformedInteger { value: String },

    #[error("mixing number separators is not supported, use comma, dash or AND [{content}]")]
    MixedSeparators { content: String },

    #[error("invalid 'enter at' format [{content}], supply exactly two values e.g. ENTER BETWEEN: 0.1 - 0.5")]
    InvalidEnterAt { content: String },

    #[error("invalid enter range [{content}], the second number in the range should be higher")]
    InvalidEnterRange { content: String },

    #[error("invalid enter range [{content}], a range of 0 - 0 enters nowhere, use ENTER: IMMEDIATELY")]
    ZeroEnterRange { content: String },

    #[error("maximum timeout after {max_days} days [{value}]")]
    MaximumInvalidation { max_days: i64, value: String },

    #[error("unsupported exchange for exchange [{name}]")]
    UnsupportedExchange { name: String },

    #[error("unsupported datetime format for datetime [{value}]")]
    UnsupportedDateTimeFormat { value: String },

    #[error("'market' required, e.g. MARKET: BTC/USDT")]
    MarketRequired,

    #[error("'start at' required, e.g. START AT: 2021-06-22T15:21:03Z")]
    StartAtRequired,

    #[error("enter range required, e.g. ENTER BETWEEN: 0.1 - 0.5 or ENTER: IMMEDIATELY")]
    EnterRangeRequired,
}

impl TranspileError {
    pub fn already_supplied(field: Field, raw: &str) -> Self {
        TranspileError::AlreadySupplied {
            field,
            raw: raw.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TranspileError::UnrecognizedInstruction { .. } => ErrorKind::Unrecognized,
            TranspileError::AlreadySupplied { .. } => ErrorKind::DuplicateField,
            TranspileError::MalformedFloat { .. }
            | TranspileError::MalformedInteger { .. }
            | TranspileError::MixedSeparators { .. }
            | TranspileError::InvalidEnterAt { .. } => ErrorKind::MalformedValue,
            TranspileError::InvalidEnterRange { .. }
            | TranspileError::ZeroEnterRange { .. }
            | TranspileError::MaximumInvalidation { .. }
            | TranspileError::UnsupportedExchange { .. }
            | TranspileError::UnsupportedDateTimeFormat { .. } => ErrorKind::SemanticRange,
            TranspileError::MarketRequired
            | TranspileError::StartAtRequired
            | TranspileError::EnterRangeRequired => ErrorKind::MissingRequired,
        }
    }
}

/// Summary error for callers that want a `Result` out of a finished report
#[derive(Error, Debug, Clone, PartialEq)]
#[error("there were errors transpiling: {}", errors.join("; "))]
pub struct TranspileFailure {
    pub errors: Vec<String>,
}

/// Errors loading or validating transpiler configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_supplied_message() {
        let err = TranspileError::already_supplied(Field::Market, "MARKET: ETH/USDT");
        assert_eq!(
            err.to_string(),
            "market already supplied [MARKET: ETH/USDT]"
        );
        assert_eq!(err.kind(), ErrorKind::DuplicateField);
    }

    #[test]
    fn test_unrecognized_message_carries_line() {
        let err = TranspileError::UnrecognizedInstruction {
            line: 3,
            raw: "BUY THE DIP".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unrecognized instruction at line 3 with content [BUY THE DIP]"
        );
        assert_eq!(err.kind(), ErrorKind::Unrecognized);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            TranspileError::MixedSeparators {
                content: "1, 2-3".into()
            }
            .kind(),
            ErrorKind::MalformedValue
        );
        assert_eq!(
            TranspileError::MaximumInvalidation {
                max_days: 7,
                value: "10".into()
            }
            .kind(),
            ErrorKind::SemanticRange
        );
        assert_eq!(
            TranspileError::MarketRequired.kind(),
            ErrorKind::MissingRequired
        );
    }

    #[test]
    fn test_failure_lists_errors() {
        let failure = TranspileFailure {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(failure.to_string(), "there were errors transpiling: a; b");
    }
}
