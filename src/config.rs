use crate::domain::Role;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// One bearer token accepted by the API, with the identity it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub token: String,
    pub role: Role,
    pub principal: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Interval of the expiry/activation sweep, in seconds.
    pub sweep_interval_secs: u64,
    pub api_tokens: Vec<ApiToken>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let sweep_interval_secs = env_map
            .get("SWEEP_INTERVAL_SECS")
            .map(|s| s.as_str())
            .unwrap_or("60")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SWEEP_INTERVAL_SECS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let api_tokens = parse_api_tokens_from_map(&env_map)?;
        if api_tokens.is_empty() {
            return Err(ConfigError::MissingEnv("API_TOKENS".to_string()));
        }

        Ok(Config {
            port,
            database_path,
            sweep_interval_secs,
            api_tokens,
        })
    }
}

/// Parse tokens from `API_TOKENS` (comma-separated) or `API_TOKENS_FILE`
/// (one per line). Each entry is `token:role:principal`.
fn parse_api_tokens_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<ApiToken>, ConfigError> {
    let entries: Vec<String> = if let Some(tokens_str) = env_map.get("API_TOKENS") {
        tokens_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else if let Some(file_path) = env_map.get("API_TOKENS_FILE") {
        let content = std::fs::read_to_string(file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "API_TOKENS_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    entries.iter().map(|entry| parse_token_entry(entry)).collect()
}

fn parse_token_entry(entry: &str) -> Result<ApiToken, ConfigError> {
    let mut parts = entry.splitn(3, ':');
    let (token, role, principal) = match (parts.next(), parts.next(), parts.next()) {
        (Some(t), Some(r), Some(p)) if !t.is_empty() && !p.is_empty() => (t, r, p),
        _ => {
            return Err(ConfigError::InvalidValue(
                "API_TOKENS".to_string(),
                format!("entry must be token:role:principal, got {}", entry),
            ))
        }
    };

    let role = Role::from_str(role).map_err(|_| {
        ConfigError::InvalidValue(
            "API_TOKENS".to_string(),
            format!("role must be vendor or admin, got {}", role),
        )
    })?;

    Ok(ApiToken {
        token: token.to_string(),
        role,
        principal: principal.to_string(),
    })
}
