use std::path::Path;

use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, ConfigOverrides, LoggingSettings, MarketSettings, PortfolioSettings, QuoteSeed,
};

/// The file read when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `TRADESIM__PORTFOLIO__INITIAL_BALANCE=5000`.
pub const ENV_PREFIX: &str = "TRADESIM";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `TRADESIM__*` environment variables. An explicitly given `path` must exist;
/// the default `config.toml` may be absent. The result is validated before it
/// is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    debug!(path = %path.display(), required, "Loading configuration");

    let builder = config::Config::builder()
        .add_source(
            config::File::new(&path.to_string_lossy(), config::FileFormat::Toml).required(required),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
