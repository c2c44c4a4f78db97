use crate::error::ConfigError;
use core_types::{CoreError, MarketQuote, normalize_symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing ones fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portfolio: PortfolioSettings,
    pub market: MarketSettings,
    pub logging: LoggingSettings,
}

/// Parameters for the investor's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    /// Cash the session starts with.
    pub initial_balance: Decimal,
}

/// The simulated market's starting state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    /// Seed for the price RNG. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
    /// The tradable symbols and their opening prices.
    pub quotes: Vec<QuoteSeed>,
}

/// One tradable symbol and its opening price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeed {
    pub symbol: String,
    pub price: Decimal,
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// Directory for daily rolling log files. Logs go to stderr when unset.
    pub directory: Option<PathBuf>,
    /// File name prefix for the rolling log files.
    pub file_prefix: String,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            initial_balance: dec!(10000.00),
        }
    }
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            rng_seed: None,
            quotes: vec![
                QuoteSeed::new("APPLE", dec!(150.00)),
                QuoteSeed::new("GOOGLE", dec!(2800.00)),
                QuoteSeed::new("AMAZON", dec!(3400.00)),
                QuoteSeed::new("MSFT", dec!(300.00)),
            ],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            directory: None,
            file_prefix: "tradesim.log".to_string(),
        }
    }
}

impl QuoteSeed {
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    /// Builds the live quote, with the symbol in canonical (upper-case) form.
    pub fn to_quote(&self) -> Result<MarketQuote, CoreError> {
        MarketQuote::new(normalize_symbol(&self.symbol), self.price)
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Starting cash balance, overriding `portfolio.initial_balance`.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub initial_balance: Option<Decimal>,

    /// Seed for the price RNG, overriding `market.rng_seed`.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Applies command-line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(balance) = overrides.initial_balance {
            self.portfolio.initial_balance = balance;
        }
        if let Some(seed) = overrides.rng_seed {
            self.market.rng_seed = Some(seed);
        }
    }

    /// Checks the invariants the simulation relies on at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.portfolio.initial_balance < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "portfolio.initial_balance cannot be negative, got {}",
                self.portfolio.initial_balance
            )));
        }

        if self.market.quotes.is_empty() {
            return Err(ConfigError::ValidationError(
                "market.quotes must list at least one symbol".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for seed in &self.market.quotes {
            let quote = seed
                .to_quote()
                .map_err(|e| ConfigError::ValidationError(format!("market.quotes: {e}")))?;
            if !seen.insert(quote.symbol().to_string()) {
                return Err(ConfigError::ValidationError(format!(
                    "market.quotes: {}",
                    CoreError::DuplicateSymbol(quote.symbol().to_string())
                )));
            }
        }

        if self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.file_prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds the market's seed quotes.
    pub fn seed_quotes(&self) -> Result<Vec<MarketQuote>, CoreError> {
        self.market.quotes.iter().map(QuoteSeed::to_quote).collect()
    }
}
