use std::{collections::HashMap, env, fmt, time::Duration};

const DEFAULT_PRODUCTS_TABLE_NAME: &str = "products";
const DEFAULT_EVENT_GRID_TIMEOUT_MS: u64 = 5000;

/// Storage backend selected by `DATABASE_BACKEND`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseBackend {
    Dynamo,
    Memory,
}

/// Process-wide configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_backend: DatabaseBackend,
    pub products_table: String,
    pub event_grid: EventGridConfig,
}

/// Topic the order publisher posts envelopes to.
#[derive(Clone, PartialEq, Eq)]
pub struct EventGridConfig {
    pub endpoint: String,
    pub key: String,
    pub timeout: Duration,
}

// The topic key is a credential, keep it out of logs.
impl fmt::Debug for EventGridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGridConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "missing required environment variable {name}"),
            ConfigError::Invalid { name, reason } => {
                write!(f, "invalid value for {name}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_backend = match optional(vars, "DATABASE_BACKEND") {
            None | Some("dynamo") => DatabaseBackend::Dynamo,
            Some("memory") => DatabaseBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "DATABASE_BACKEND",
                    reason: format!("expected \"dynamo\" or \"memory\", got \"{other}\""),
                })
            }
        };

        let products_table = optional(vars, "PRODUCTS_TABLE_NAME")
            .unwrap_or(DEFAULT_PRODUCTS_TABLE_NAME)
            .to_string();

        let endpoint = required(vars, "EVENT_GRID_ENDPOINT")?;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: "EVENT_GRID_ENDPOINT",
                reason: "must be an http(s) URL".to_string(),
            });
        }

        let key = required(vars, "EVENT_GRID_KEY")?;

        let timeout_ms = match optional(vars, "EVENT_GRID_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "EVENT_GRID_TIMEOUT_MS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_EVENT_GRID_TIMEOUT_MS,
        };

        Ok(Self {
            database_backend,
            products_table,
            event_grid: EventGridConfig {
                endpoint,
                key,
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}

fn optional<'a>(vars: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn required(vars: &HashMap<String, String>, name: &'static str) -> Result<String, ConfigError> {
    optional(vars, name)
        .map(str::to_string)
        .ok_or(ConfigError::Missing(name))
}
