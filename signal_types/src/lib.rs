//! Signal Types - Foundation Types
//!
//! This crate contains pure data structures exchanged between the signal
//! transpiler, its transport layer and the downstream signal checker.
//!
//! ## Contents
//!
//! Pure data structures only:
//! - The signal configuration accumulated while transpiling
//! - Token classes and tokens used for syntax-highlighted rendering
//!
//! ## Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES** - Cannot depend on other workspace crates
//! 3. **SERIALIZABLE** - All types must support serde

use serde::{Deserialize, Serialize};

// ============================================================================
// SIGNAL CONFIGURATION
// ============================================================================

/// Entry range sentinel meaning "enter immediately".
pub const ENTER_IMMEDIATELY: f64 = -1.0;

/// Structured signal handed verbatim to the downstream signal checker.
///
/// Zero values mean "unset" for the asset names, entry range, exchange,
/// initial timestamp and invalidation window. The short flag and the stop
/// loss carry explicit presence flags instead, since `false` and `0` are
/// legitimate explicit values for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    /// Base asset of the market, e.g. `BTC`
    pub base_asset: String,
    /// Quote asset of the market, e.g. `USDT`
    pub quote_asset: String,
    /// Low end of the entry range (`-1` with high `-1` means immediate entry)
    pub enter_range_low: f64,
    /// High end of the entry range
    pub enter_range_high: f64,
    /// Take-profit levels in the order they were written
    pub take_profits: Vec<f64>,
    pub stop_loss: f64,
    /// Lower-cased exchange identifier
    pub exchange: String,
    /// Signal start time (RFC 3339)
    #[serde(rename = "initialISO8601")]
    pub initial_iso8601: String,
    pub is_short: bool,
    pub invalidate_after_seconds: i64,
    /// Display-only flag asking the checker to return candlesticks
    pub return_candlesticks: bool,

    /// Whether LONG or SHORT was given (explicitly or inferred)
    #[serde(skip)]
    pub is_short_set: bool,
    /// Whether a stop loss was given
    #[serde(skip)]
    pub stop_loss_set: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            base_asset: String::new(),
            quote_asset: String::new(),
            enter_range_low: 0.0,
            enter_range_high: 0.0,
            take_profits: Vec::new(),
            stop_loss: 0.0,
            exchange: String::new(),
            initial_iso8601: String::new(),
            is_short: false,
            invalidate_after_seconds: 0,
            return_candlesticks: true,
            is_short_set: false,
            stop_loss_set: false,
        }
    }
}

impl SignalConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// True once either asset has been assigned
    pub fn has_market(&self) -> bool {
        !self.base_asset.is_empty() || !self.quote_asset.is_empty()
    }

    /// True when both assets are present
    pub fn has_complete_market(&self) -> bool {
        !self.base_asset.is_empty() && !self.quote_asset.is_empty()
    }

    /// True unless the entry range is still the zero/zero unset state
    pub fn has_enter_range(&self) -> bool {
        self.enter_range_low != 0.0 || self.enter_range_high != 0.0
    }

    pub fn enters_immediately(&self) -> bool {
        self.enter_range_low == ENTER_IMMEDIATELY && self.enter_range_high == ENTER_IMMEDIATELY
    }

    pub fn has_exchange(&self) -> bool {
        !self.exchange.is_empty()
    }

    pub fn has_initial_iso8601(&self) -> bool {
        !self.initial_iso8601.is_empty()
    }

    pub fn has_invalidate_after(&self) -> bool {
        self.invalidate_after_seconds > 0
    }
}

// ============================================================================
// TOKENS
// ============================================================================

/// Display class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Instruction keyword, e.g. `TAKE PROFIT`
    Instruction,
    /// Colons, separators and spacing
    Punctuation,
    /// Parsed values and identifiers
    Expression,
    Comment,
    /// Malformed or conflicting text
    Error,
}

impl TokenType {
    /// Get the class name used by renderers
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Instruction => "instruction",
            TokenType::Punctuation => "punctuation",
            TokenType::Expression => "expression",
            TokenType::Comment => "comment",
            TokenType::Error => "error",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span of a line together with its display class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputToken {
    pub input: String,
    pub token_type: TokenType,
}

impl InputToken {
    pub fn new(input: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            input: input.into(),
            token_type,
        }
    }

    pub fn instruction(input: impl Into<String>) -> Self {
        Self::new(input, TokenType::Instruction)
    }

    pub fn punctuation(input: impl Into<String>) -> Self {
        Self::new(input, TokenType::Punctuation)
    }

    pub fn expression(input: impl Into<String>) -> Self {
        Self::new(input, TokenType::Expression)
    }

    pub fn comment(input: impl Into<String>) -> Self {
        Self::new(input, TokenType::Comment)
    }

    pub fn error(input: impl Into<String>) -> Self {
        Self::new(input, TokenType::Error)
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

/// Tokens of one rendered line
pub type TokenizedLine = Vec<InputToken>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_unset() {
        let config = SignalConfig::new();
        assert!(!config.has_market());
        assert!(!config.has_enter_range());
        assert!(!config.has_exchange());
        assert!(!config.has_initial_iso8601());
        assert!(!config.has_invalidate_after());
        assert!(!config.is_short_set);
        assert!(config.return_candlesticks);
    }

    #[test]
    fn test_immediate_entry_counts_as_set() {
        let config = SignalConfig {
            enter_range_low: ENTER_IMMEDIATELY,
            enter_range_high: ENTER_IMMEDIATELY,
            ..SignalConfig::default()
        };
        assert!(config.has_enter_range());
        assert!(config.enters_immediately());
    }

    #[test]
    fn test_config_wire_names() {
        let config = SignalConfig {
            base_asset: "BTC".to_string(),
            quote_asset: "USDT".to_string(),
            initial_iso8601: "2021-06-22T15:21:03Z".to_string(),
            is_short_set: true,
            ..SignalConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["baseAsset"], "BTC");
        assert_eq!(json["initialISO8601"], "2021-06-22T15:21:03Z");
        assert_eq!(json["returnCandlesticks"], true);
        assert!(json.get("isShortSet").is_none());
    }

    #[test]
    fn test_token_serializes_class_name() {
        let token = InputToken::instruction("MARKET");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"input":"MARKET","tokenType":"instruction"}"#);
        assert_eq!(TokenType::Error.to_string(), "error");
    }
}
