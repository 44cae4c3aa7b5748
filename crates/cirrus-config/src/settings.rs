use cirrus_domain::SubscriptionId;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_LOCATION: &str = "westus";

const TENANT_ID: &str = "AZURE_TENANT_ID";
const CLIENT_ID: &str = "AZURE_CLIENT_ID";
const CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
const SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
const RUN_LONG_TASKS: &str = "CIRRUS_RUN_LONG_TASKS";
const LOCATION: &str = "CIRRUS_DEFAULT_LOCATION";

/// Service-principal credentials for the client-credentials token flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: SubscriptionId,
}

/// Runtime settings, constructed once per process and passed by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    /// Gates operations that are expensive or slow on the remote side
    /// (VM provisioning, storage account creation). Defaults to off.
    pub run_long_tasks: bool,
    /// Region used when a caller does not name one explicitly.
    pub default_location: String,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup. `from_env` delegates
    /// here; tests supply a map instead of mutating process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::MissingVar(var));

        let credentials = Credentials {
            tenant_id: required(TENANT_ID)?,
            client_id: required(CLIENT_ID)?,
            client_secret: required(CLIENT_SECRET)?,
            subscription_id: SubscriptionId::new(required(SUBSCRIPTION_ID)?),
        };

        let run_long_tasks = match lookup(RUN_LONG_TASKS) {
            None => false,
            Some(raw) => parse_flag(RUN_LONG_TASKS, &raw)?,
        };

        let default_location = lookup(LOCATION).unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        debug!(
            subscription = %credentials.subscription_id,
            run_long_tasks,
            location = %default_location,
            "settings loaded"
        );

        Ok(Settings {
            credentials,
            run_long_tasks,
            default_location,
        })
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: raw.to_string(),
            message: "expected a boolean (1/0, true/false, yes/no, on/off)".into(),
        }),
    }
}
