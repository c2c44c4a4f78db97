use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or an environment override could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
