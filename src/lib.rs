//! Signal Transpiler
//!
//! Converts free-form trading signal text, one directive per line, into a
//! validated [`SignalConfig`] for the downstream signal checker, together with
//! a classified token rendering of the input and a list of errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use signal_transpiler::transpile;
//!
//! let output = transpile("MARKET: BTC/USDT\nSTART AT: 2021-06-22T15:21:03Z\nENTER: NOW");
//! assert!(!output.has_errors());
//! assert_eq!(output.signal_input.exchange, "binance");
//! ```

// Core error handling
pub mod error;

// Registries, limits and server settings
pub mod config;

// Matcher registry and resolution engine
pub mod transpiler;

// HTTP front end (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use config::{InferenceDefaults, ServerConfig, TranspilerConfig};
pub use error::{ConfigError, ErrorKind, Field, TranspileError, TranspileFailure};
pub use signal_types::{InputToken, SignalConfig, TokenType, TokenizedLine, ENTER_IMMEDIATELY};
pub use transpiler::{transpile, InstructionRecord, Matcher, SignalTranspiler, TranspilerOutput};
