use std::env;
use std::str::FromStr;
use tracing::{info, warn};

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub log_format: LogFormat,
    pub pretty_output: bool,
}

impl Config {
    /// Only the log format is read here, since it is needed before the logger exists.
    pub fn log_format_from_env() -> LogFormat {
        env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Reads the full configuration. Invalid values fall back to defaults with a warning,
    /// so call this after the logger is initialized.
    pub fn from_env() -> Self {
        Self {
            log_format: read_var("LOG_FORMAT", LogFormat::default()),
            pretty_output: read_var("PRETTY_OUTPUT", false),
        }
    }
}

fn read_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    parse_var(name, env::var(name).ok(), default)
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) => {
            info!("Using {:?} from environment variable {}.", value, name);
            value
        }
        Err(_) => {
            warn!(
                "Invalid {} value '{}' in environment. Using default {:?}.",
                name, raw, default
            );
            default
        }
    }
}
