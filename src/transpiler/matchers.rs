//! Instruction matcher registry
//!
//! Every signal line kind is one `Matcher` variant. The registry tries the
//! variants in `MATCHERS` order against the upper-cased line and commits to
//! the first one that claims it. A matcher claims a line by returning
//! `Some(MatchOutcome)`, even when the line then fails its own validation;
//! `None` lets the next matcher look at the line.
//!
//! Matchers validate before writing, so a rejected line never leaves a
//! partially updated signal behind.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use signal_types::{InputToken, SignalConfig, TokenizedLine, ENTER_IMMEDIATELY};

use super::dates::try_parse_date;
use super::numbers::{extract_float_sequence, parse_single_float};
use super::tokens::{error_line, format_float, LineTokens};
use crate::config::TranspilerConfig;
use crate::error::{Field, TranspileError};

// =============================================================================
// LINE PATTERNS (matched against the upper-cased line)
// =============================================================================

static MARKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(PAIR:?|SYMBOL:?|MARKET:?)?\s*([[:upper:]]{2,6})[/-]([[:upper:]]{2,6})\s*(//.*)?$")
        .unwrap()
});

static BLANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(//.*)?$").unwrap());

static ENTER_IMMEDIATELY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(ENTER:?)\s*(NOW|IMMEDIATELY)\s*(//.*)?$").unwrap()
});

static ENTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(ENTER:?|ENTER AT:?|ENTER BETWEEN:?|ENTER RANGE:?)\s*(([0-9.][0-9.,]*\s*(,|-|AND)?\s*)+?)\s*(//.*)?$",
    )
    .unwrap()
});

static TAKE_PROFIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(TAKE PROFIT:?|TP:?)\s*(([0-9.][0-9.,]*\s*(,|-|AND)?\s*)+?)\s*(//.*)?$").unwrap()
});

static STOP_LOSS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(STOP LOSS:?|SL:?)?\s*([0-9.]+(?:,[0-9]{3})*(?:\.[0-9]*)?)\s*(//.*)?$").unwrap()
});

static EXCHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(EXCHANGE:?|PLATFORM:?)?\s*([A-Z][A-Z.]*(?: [A-Z][A-Z.]*)*)\s*(//.*)?$")
        .unwrap()
});

static START_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(START AT|INITIALISO8601|FROM|AT|START)(?::\s*|\s+))?(.+?)\s*(//.*)?$")
        .unwrap()
});

static LONG_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(LONG|SHORT)\s*(//.*)?$").unwrap());

static INVALIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(TIMEOUT|INVALIDATE) (IN|AFTER|WITHIN):?)?\s*([0-9.]+?)\s+DAYS?\s*(//.*)?$")
        .unwrap()
});

const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// REGISTRY
// =============================================================================

/// One recognizable line kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    Market,
    Blank,
    EnterImmediately,
    EnterRange,
    TakeProfit,
    StopLoss,
    Exchange,
    StartAt,
    LongShort,
    Invalidate,
}

/// Priority order. Earlier matchers win lines that later ones could also claim.
pub const MATCHERS: [Matcher; 10] = [
    Matcher::Market,
    Matcher::Blank,
    Matcher::EnterImmediately,
    Matcher::EnterRange,
    Matcher::TakeProfit,
    Matcher::StopLoss,
    Matcher::Exchange,
    Matcher::StartAt,
    Matcher::LongShort,
    Matcher::Invalidate,
];

/// Result of a matcher claiming a line
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub tokens: TokenizedLine,
    pub error: Option<TranspileError>,
}

impl MatchOutcome {
    fn ok(tokens: TokenizedLine) -> Self {
        Self {
            tokens,
            error: None,
        }
    }

    fn failed(tokens: TokenizedLine, error: TranspileError) -> Self {
        Self {
            tokens,
            error: Some(error),
        }
    }

    /// Whole line rendered as an error for a field that is already set
    fn already_supplied(field: Field, raw: &str) -> Self {
        Self::failed(error_line(raw), TranspileError::already_supplied(field, raw))
    }
}

impl Matcher {
    pub fn name(&self) -> &'static str {
        match self {
            Matcher::Market => "market",
            Matcher::Blank => "blank",
            Matcher::EnterImmediately => "enter-immediately",
            Matcher::EnterRange => "enter-range",
            Matcher::TakeProfit => "take-profit",
            Matcher::StopLoss => "stop-loss",
            Matcher::Exchange => "exchange",
            Matcher::StartAt => "start-at",
            Matcher::LongShort => "long-short",
            Matcher::Invalidate => "invalidate",
        }
    }

    /// Signal field this matcher assigns under the single-assignment rule
    pub fn field(&self) -> Option<Field> {
        match self {
            Matcher::Market => Some(Field::Market),
            Matcher::EnterImmediately | Matcher::EnterRange => Some(Field::EnterRange),
            Matcher::StopLoss => Some(Field::StopLoss),
            Matcher::Exchange => Some(Field::Exchange),
            Matcher::StartAt => Some(Field::StartAt),
            Matcher::LongShort => Some(Field::ShortLong),
            Matcher::Invalidate => Some(Field::InvalidateAfter),
            Matcher::Blank | Matcher::TakeProfit => None,
        }
    }

    /// Claim `raw` and apply it to `signal`, or return `None` to fall through
    pub fn try_apply(
        &self,
        raw: &str,
        signal: &mut SignalConfig,
        config: &TranspilerConfig,
    ) -> Option<MatchOutcome> {
        let upper = raw.to_uppercase();
        match self {
            Matcher::Market => apply_market(raw, &upper, signal),
            Matcher::Blank => apply_blank(raw, &upper),
            Matcher::EnterImmediately => apply_enter_immediately(raw, &upper, signal),
            Matcher::EnterRange => apply_enter_range(raw, &upper, signal),
            Matcher::TakeProfit => apply_take_profit(raw, &upper, signal),
            Matcher::StopLoss => apply_stop_loss(raw, &upper, signal),
            Matcher::Exchange => apply_exchange(raw, &upper, signal, config),
            Matcher::StartAt => apply_start_at(raw, &upper, signal, config),
            Matcher::LongShort => apply_long_short(raw, &upper, signal),
            Matcher::Invalidate => apply_invalidate(raw, &upper, signal, config),
        }
    }
}

/// Original-case trailing comment, if the pattern captured one
fn trailing_comment<'a>(raw: &'a str, caps: &Captures<'_>, group: usize) -> Option<&'a str> {
    caps.get(group)?;
    raw.find("//").map(|start| raw[start..].trim_end())
}

fn group<'a>(caps: &Captures<'a>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str().trim())
}

// =============================================================================
// MATCHERS
// =============================================================================

fn apply_market(raw: &str, upper: &str, signal: &mut SignalConfig) -> Option<MatchOutcome> {
    let caps = MARKET_RE.captures(upper)?;
    if signal.has_market() {
        return Some(MatchOutcome::already_supplied(Field::Market, raw));
    }
    signal.base_asset = group(&caps, 2).to_string();
    signal.quote_asset = group(&caps, 3).to_string();
    Some(MatchOutcome::ok(
        LineTokens::labelled("MARKET")
            .expression(signal.base_asset.as_str())
            .punctuation("/")
            .expression(signal.quote_asset.as_str())
            .comment(trailing_comment(raw, &caps, 4))
            .build(),
    ))
}

fn apply_blank(raw: &str, upper: &str) -> Option<MatchOutcome> {
    let caps = BLANK_RE.captures(upper)?;
    let tokens = match trailing_comment(raw, &caps, 1) {
        Some(comment) => vec![InputToken::comment(comment)],
        None => LineTokens::new().punctuation(" ").build(),
    };
    Some(MatchOutcome::ok(tokens))
}

fn apply_enter_immediately(
    raw: &str,
    upper: &str,
    signal: &mut SignalConfig,
) -> Option<MatchOutcome> {
    let caps = ENTER_IMMEDIATELY_RE.captures(upper)?;
    if signal.has_enter_range() {
        return Some(MatchOutcome::already_supplied(Field::EnterRange, raw));
    }
    signal.enter_range_low = ENTER_IMMEDIATELY;
    signal.enter_range_high = ENTER_IMMEDIATELY;
    Some(MatchOutcome::ok(
        LineTokens::labelled("ENTER")
            .expression("IMMEDIATELY")
            .comment(trailing_comment(raw, &caps, 3))
            .build(),
    ))
}

fn apply_enter_range(raw: &str, upper: &str, signal: &mut SignalConfig) -> Option<MatchOutcome> {
    let caps = ENTER_RE.captures(upper)?;
    if signal.has_enter_range() {
        return Some(MatchOutcome::already_supplied(Field::EnterRange, raw));
    }
    let values = group(&caps, 2);
    let comment = trailing_comment(raw, &caps, 5);
    let rejected = |error: TranspileError| {
        MatchOutcome::failed(
            LineTokens::labelled("ENTER BETWEEN")
                .error(values)
                .comment(comment)
                .build(),
            error,
        )
    };

    let numbers = match extract_float_sequence(values) {
        Ok(numbers) => numbers,
        Err(err) => return Some(rejected(err)),
    };
    let &[low, high] = numbers.as_slice() else {
        return Some(rejected(TranspileError::InvalidEnterAt {
            content: values.to_string(),
        }));
    };

    if low > high {
        return Some(MatchOutcome::failed(
            LineTokens::labelled("ENTER BETWEEN")
                .expression(format_float(low))
                .punctuation(" - ")
                .error(format_float(high))
                .comment(comment)
                .build(),
            TranspileError::InvalidEnterRange {
                content: values.to_string(),
            },
        ));
    }

    // 0 - 0 is indistinguishable from an unset range
    if low == 0.0 && high == 0.0 {
        return Some(rejected(TranspileError::ZeroEnterRange {
            content: values.to_string(),
        }));
    }

    signal.enter_range_low = low;
    signal.enter_range_high = high;
    Some(MatchOutcome::ok(
        LineTokens::labelled("ENTER BETWEEN")
            .expression(format_float(low))
            .punctuation(" - ")
            .expression(format_float(high))
            .comment(comment)
            .build(),
    ))
}

fn apply_take_profit(raw: &str, upper: &str, signal: &mut SignalConfig) -> Option<MatchOutcome> {
    let caps = TAKE_PROFIT_RE.captures(upper)?;
    let values = group(&caps, 2);
    let comment = trailing_comment(raw, &caps, 5);

    let levels = match extract_float_sequence(values) {
        Ok(levels) => levels,
        Err(err) => {
            return Some(MatchOutcome::failed(
                LineTokens::labelled("TAKE PROFIT")
                    .error(values)
                    .comment(comment)
                    .build(),
                err,
            ))
        }
    };

    let mut tokens = LineTokens::labelled("TAKE PROFIT");
    for (i, level) in levels.iter().enumerate() {
        if i > 0 {
            tokens = tokens.punctuation(", ");
        }
        tokens = tokens.expression(format_float(*level));
    }
    signal.take_profits.extend(levels);
    Some(MatchOutcome::ok(tokens.comment(comment).build()))
}

fn apply_stop_loss(raw: &str, upper: &str, signal: &mut SignalConfig) -> Option<MatchOutcome> {
    let caps = STOP_LOSS_RE.captures(upper)?;
    if signal.stop_loss_set {
        return Some(MatchOutcome::already_supplied(Field::StopLoss, raw));
    }
    let value = group(&caps, 2);
    let comment = trailing_comment(raw, &caps, 3);
    match parse_single_float(value) {
        Ok(stop_loss) => {
            signal.stop_loss = stop_loss;
            signal.stop_loss_set = true;
            Some(MatchOutcome::ok(
                LineTokens::labelled("STOP LOSS")
                    .expression(format_float(stop_loss))
                    .comment(comment)
                    .build(),
            ))
        }
        Err(err) => Some(MatchOutcome::failed(
            LineTokens::labelled("STOP LOSS")
                .error(value)
                .comment(comment)
                .build(),
            err,
        )),
    }
}

fn apply_exchange(
    raw: &str,
    upper: &str,
    signal: &mut SignalConfig,
    config: &TranspilerConfig,
) -> Option<MatchOutcome> {
    let caps = EXCHANGE_RE.captures(upper)?;
    let labelled = caps.get(1).is_some();
    let name = group(&caps, 2);
    if !labelled && !config.is_known_exchange(name) {
        return None;
    }
    let comment = trailing_comment(raw, &caps, 3);
    if labelled && !config.is_supported_exchange(name) {
        return Some(MatchOutcome::failed(
            LineTokens::labelled("EXCHANGE")
                .error(name)
                .comment(comment)
                .build(),
            TranspileError::UnsupportedExchange {
                name: name.to_string(),
            },
        ));
    }
    if signal.has_exchange() {
        return Some(MatchOutcome::already_supplied(Field::Exchange, raw));
    }
    signal.exchange = name.to_lowercase();
    Some(MatchOutcome::ok(
        LineTokens::labelled("EXCHANGE")
            .expression(name)
            .comment(comment)
            .build(),
    ))
}

fn apply_start_at(
    raw: &str,
    upper: &str,
    signal: &mut SignalConfig,
    config: &TranspilerConfig,
) -> Option<MatchOutcome> {
    let caps = START_AT_RE.captures(upper)?;
    let labelled = caps.get(1).is_some();
    let value = group(&caps, 2);
    let parsed = try_parse_date(value, &config.date_formats);
    if !labelled && parsed.is_none() {
        return None;
    }
    if signal.has_initial_iso8601() {
        return Some(MatchOutcome::already_supplied(Field::StartAt, raw));
    }
    let comment = trailing_comment(raw, &caps, 3);
    let Some(iso8601) = parsed else {
        return Some(MatchOutcome::failed(
            LineTokens::labelled("START AT")
                .error(value)
                .comment(comment)
                .build(),
            TranspileError::UnsupportedDateTimeFormat {
                value: value.to_string(),
            },
        ));
    };
    signal.initial_iso8601 = iso8601;
    Some(MatchOutcome::ok(
        LineTokens::labelled("START AT")
            .expression(value)
            .comment(comment)
            .build(),
    ))
}

fn apply_long_short(raw: &str, upper: &str, signal: &mut SignalConfig) -> Option<MatchOutcome> {
    let caps = LONG_SHORT_RE.captures(upper)?;
    if signal.is_short_set {
        return Some(MatchOutcome::already_supplied(Field::ShortLong, raw));
    }
    let direction = group(&caps, 1);
    signal.is_short_set = true;
    signal.is_short = direction == "SHORT";
    Some(MatchOutcome::ok(
        LineTokens::new()
            .instruction(direction)
            .comment(trailing_comment(raw, &caps, 2))
            .build(),
    ))
}

fn apply_invalidate(
    raw: &str,
    upper: &str,
    signal: &mut SignalConfig,
    config: &TranspilerConfig,
) -> Option<MatchOutcome> {
    let caps = INVALIDATE_RE.captures(upper)?;
    if signal.has_invalidate_after() {
        return Some(MatchOutcome::already_supplied(Field::InvalidateAfter, raw));
    }
    let value = group(&caps, 3);
    let comment = trailing_comment(raw, &caps, 4);
    let rejected = |error: TranspileError| {
        MatchOutcome::failed(
            LineTokens::labelled("TIMEOUT AFTER")
                .error(value)
                .expression(" DAYS")
                .comment(comment)
                .build(),
            error,
        )
    };

    let days = match value.parse::<i64>() {
        Ok(days) => days,
        Err(_) => {
            return Some(rejected(TranspileError::MalformedInteger {
                value: value.to_string(),
            }))
        }
    };
    if days > config.max_invalidation_days {
        return Some(rejected(TranspileError::MaximumInvalidation {
            max_days: config.max_invalidation_days,
            value: value.to_string(),
        }));
    }

    signal.invalidate_after_seconds = days * SECONDS_PER_DAY;
    Some(MatchOutcome::ok(
        LineTokens::labelled("TIMEOUT AFTER")
            .expression(days.to_string())
            .expression(" DAYS")
            .comment(comment)
            .build(),
    ))
}
