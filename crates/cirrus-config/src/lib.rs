mod settings;
pub mod error;

pub use error::ConfigError;
pub use settings::{Credentials, Settings, DEFAULT_LOCATION};
