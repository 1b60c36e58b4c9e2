//! Transpiler and server configuration
//!
//! `TranspilerConfig` holds the read-only registries the matchers consult
//! (exchange lists, datetime formats, limits and inference defaults). It is
//! built once at startup, optionally from YAML, and shared by reference.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Keyword in `date_formats` selecting RFC 3339 parsing
pub const RFC3339_FORMAT: &str = "rfc3339";

const KNOWN_EXCHANGES: &[&str] = &[
    "BINANCE",
    "BINANCE FUTURES",
    "BINANCEUSDMFUTURES",
    "BINANCE USDM FUTURES",
    "HUOBI",
    "COINBASE",
    "KRAKEN",
    "KUCOIN",
    "BITHUMB",
    "BINANCE.US",
    "BITFINEX",
    "GATE.IO",
    "BITSTAMP",
    "COINONE",
    "BITFLYER",
    "GEMINI",
    "POLONIEX",
    "BITTREX",
    "OKEX",
    "LIQUID",
    "FTX",
    "COINCHECK",
    "KORBIT",
    "CRYPTO.COM",
    "UPBIT",
    "ASCENDEX",
    "BITMAX",
];

const SUPPORTED_EXCHANGES: &[&str] = &[
    "BINANCE",
    "BINANCE FUTURES",
    "BINANCEUSDMFUTURES",
    "BINANCE USDM FUTURES",
    "COINBASE",
    "KRAKEN",
    "KUCOIN",
    "FTX",
];

// ============================================================================
// Transpiler configuration
// ============================================================================

/// Registries and limits used by the matchers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspilerConfig {
    /// Exchange names recognized on a bare line (no `EXCHANGE:` label)
    pub known_exchanges: Vec<String>,
    /// Exchanges the downstream checker can evaluate
    pub supported_exchanges: Vec<String>,
    /// Datetime formats tried in order; first success wins
    pub date_formats: Vec<String>,
    pub max_invalidation_days: i64,
    /// Values used for the inference pass
    pub defaults: InferenceDefaults,
}

/// Defaults applied to fields still unset after the explicit pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceDefaults {
    pub exchange: String,
    pub short: bool,
    pub invalidate_after_days: i64,
}

impl Default for InferenceDefaults {
    fn default() -> Self {
        Self {
            exchange: "binance".to_string(),
            short: false,
            invalidate_after_days: 2,
        }
    }
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            known_exchanges: KNOWN_EXCHANGES.iter().map(|s| s.to_string()).collect(),
            supported_exchanges: SUPPORTED_EXCHANGES.iter().map(|s| s.to_string()).collect(),
            date_formats: vec![
                RFC3339_FORMAT.to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d".to_string(),
            ],
            max_invalidation_days: 7,
            defaults: InferenceDefaults::default(),
        }
    }
}

impl TranspilerConfig {
    /// Parse a YAML document; keys that are absent keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: TranspilerConfig = serde_yaml::from_str(yaml)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Exchange lists are matched against upper-cased input
    fn normalized(mut self) -> Self {
        for name in self
            .known_exchanges
            .iter_mut()
            .chain(self.supported_exchanges.iter_mut())
        {
            *name = name.trim().to_uppercase();
        }
        self.defaults.exchange = self.defaults.exchange.trim().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.known_exchanges.is_empty() {
            return Err(ConfigError::invalid("known_exchanges must not be empty"));
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::invalid("date_formats must not be empty"));
        }
        if let Some(name) = self
            .supported_exchanges
            .iter()
            .find(|name| !self.is_known_exchange(name))
        {
            return Err(ConfigError::invalid(format!(
                "supported exchange '{}' is not in known_exchanges",
                name
            )));
        }
        if self.max_invalidation_days <= 0 {
            return Err(ConfigError::invalid(
                "max_invalidation_days must be positive",
            ));
        }
        let days = self.defaults.invalidate_after_days;
        if days <= 0 || days > self.max_invalidation_days {
            return Err(ConfigError::invalid(format!(
                "default invalidate_after_days must be between 1 and {}, got {}",
                self.max_invalidation_days, days
            )));
        }
        if !self.is_supported_exchange(&self.defaults.exchange.to_uppercase()) {
            return Err(ConfigError::invalid(format!(
                "default exchange '{}' is not supported",
                self.defaults.exchange
            )));
        }
        Ok(())
    }

    /// `name` must already be upper-cased
    pub fn is_known_exchange(&self, name: &str) -> bool {
        self.known_exchanges.iter().any(|known| known == name)
    }

    /// `name` must already be upper-cased
    pub fn is_supported_exchange(&self, name: &str) -> bool {
        self.supported_exchanges
            .iter()
            .any(|supported| supported == name)
    }
}

// ============================================================================
// Server configuration
// ============================================================================

/// HTTP front end settings. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Directory holding the highlighting front end
    pub static_dir: PathBuf,
    /// Optional YAML file overriding the transpiler registries
    pub transpiler_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("static"),
            transpiler_config: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("HTS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| match p.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!(value = %p, "invalid PORT, using default");
                        None
                    }
                })
                .unwrap_or(defaults.port),
            static_dir: lookup("HTS_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            transpiler_config: lookup("HTS_CONFIG").map(PathBuf::from),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Load the transpiler registries named by this config, or the defaults
    pub fn load_transpiler_config(&self) -> Result<TranspilerConfig, ConfigError> {
        match &self.transpiler_config {
            Some(path) => TranspilerConfig::from_yaml_file(path),
            None => Ok(TranspilerConfig::default()),
        }
    }
}
