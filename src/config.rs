use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const ENV_PREFIX: &str = "REPLICA_GATEWAY_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// How replica updates are written to the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteStrategy {
    /// Strategic merge patch of `spec.replicas`.
    #[default]
    Patch,
    /// Fetch, modify and replace, guarded by the fetched resourceVersion.
    Replace,
}

impl FromStr for WriteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(Self::Patch),
            "replace" => Ok(Self::Replace),
            other => Err(format!(
                "unknown write strategy '{other}', expected 'patch' or 'replace'"
            )),
        }
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => f.write_str("patch"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// Runtime configuration, read from `REPLICA_GATEWAY_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub in_cluster: bool,
    /// Explicit kubeconfig; `None` falls back to the standard inference.
    pub kubeconfig: Option<PathBuf>,
    /// Restrict watch and writes to one namespace; `None` means cluster-wide.
    pub watch_namespace: Option<String>,
    pub write_strategy: WriteStrategy,
    pub sync_timeout: Duration,
    pub store_timeout: Duration,
    pub max_body_bytes: usize,
    pub event_queue_capacity: usize,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            in_cluster: false,
            kubeconfig: None,
            watch_namespace: None,
            write_strategy: WriteStrategy::Patch,
            sync_timeout: Duration::from_secs(60),
            store_timeout: Duration::from_secs(10),
            max_body_bytes: 150,
            event_queue_capacity: 256,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (unprefixed names are
    /// resolved with the `REPLICA_GATEWAY_` prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&get, "PORT", defaults.port)?,
            in_cluster: parse_bool_or(&get, "IN_CLUSTER", defaults.in_cluster)?,
            kubeconfig: get("KUBECONFIG").map(PathBuf::from),
            watch_namespace: get("WATCH_NAMESPACE"),
            write_strategy: parse_or(&get, "WRITE_STRATEGY", defaults.write_strategy)?,
            sync_timeout: parse_secs_or(&get, "SYNC_TIMEOUT_SECS", defaults.sync_timeout)?,
            store_timeout: parse_secs_or(&get, "STORE_TIMEOUT_SECS", defaults.store_timeout)?,
            max_body_bytes: parse_positive_or(&get, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            event_queue_capacity: parse_positive_or(
                &get,
                "EVENT_QUEUE",
                defaults.event_queue_capacity,
            )?,
            log_dir: get("LOG_DIR").map(PathBuf::from),
        })
    }
}

fn invalid(name: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key: format!("{ENV_PREFIX}{name}"),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<G, T>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(name) {
        Some(raw) => raw.parse().map_err(|e| invalid(name, &raw, e)),
        None => Ok(default),
    }
}

fn parse_positive_or<G>(get: &G, name: &str, default: usize) -> Result<usize, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, name, default)?;
    if value == 0 {
        return Err(invalid(name, "0", "must be greater than zero"));
    }
    Ok(value)
}

fn parse_secs_or<G>(get: &G, name: &str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs = parse_or(get, name, default.as_secs())?;
    if secs == 0 {
        return Err(invalid(name, "0", "must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool_or<G>(get: &G, name: &str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(invalid(name, &raw, "expected a boolean")),
        },
    }
}
