use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::Duration;
use chrono_tz::Tz;
use log::warn;
use thiserror::Error;

use crate::clients::openai_client::ModelSettings;
use crate::service::prompt::DEFAULT_PROMPT_FILE;
use crate::service::synthesizer::{DEFAULT_EVENT_MINUTES, SynthesisPolicy};

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// `KEY=VALUE` pairs from a dotenv-style file, with the process
/// environment as fallback.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Api,
    Cli,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub discord_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: ModelSettings,
    pub prompt_file: PathBuf,
    pub timezone: Tz,
    pub policy: SynthesisPolicy,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| config.lookup(key))
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match get("RUN_MODE").as_deref().map(str::trim) {
            None | Some("api") => RunMode::Api,
            Some("cli") => RunMode::Cli,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "RUN_MODE",
                    value: other.to_string(),
                });
            }
        };

        let mut model = ModelSettings::default();
        if let Some(name) = get("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            model.model = name.trim().to_string();
        }
        model.max_tokens = parse_or("OPENAI_MAX_TOKENS", get("OPENAI_MAX_TOKENS"), model.max_tokens);

        let timezone = match get("TIMEZONE") {
            Some(name) => name.trim().parse::<Tz>().unwrap_or_else(|_| {
                warn!("Unknown TIMEZONE {:?}, using {}", name, DEFAULT_TIMEZONE.name());
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        let minutes = parse_or(
            "DEFAULT_EVENT_MINUTES",
            get("DEFAULT_EVENT_MINUTES"),
            DEFAULT_EVENT_MINUTES,
        );
        let policy = SynthesisPolicy {
            default_duration: Duration::minutes(minutes.clamp(1, 24 * 60)),
            vendor_markers: parse_or("VENDOR_MARKERS", get("VENDOR_MARKERS"), true),
            overnight_rollover: parse_or("OVERNIGHT_ROLLOVER", get("OVERNIGHT_ROLLOVER"), true),
        };

        Ok(Self {
            run_mode,
            discord_token: non_empty(get("DISCORD_TOKEN")),
            openai_api_key: non_empty(get("OPENAI_API_KEY")),
            model,
            prompt_file: PathBuf::from(
                get("PROMPT_FILE").unwrap_or_else(|| DEFAULT_PROMPT_FILE.to_string()),
            ),
            timezone,
            policy,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} {:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}
