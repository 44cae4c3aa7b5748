use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("environment variable {var} has invalid value '{value}': {message}")]
    InvalidVar {
        var: &'static str,
        value: String,
        message: String,
    },
}
