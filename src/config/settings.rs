//! Application settings loading from config.toml and environment variables.
//!
//! Non-secret settings (guild, role and category IDs, API port, rate limits)
//! live in an optional `config.toml` and can be overridden per-deployment via
//! environment variables. Secrets (`DISCORD_BOT_TOKEN`, `DISCORD_BOT_SECRET`,
//! `DATABASE_URL`) are read from the environment only, at the point of use.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Fully resolved application configuration, shared via `Arc` with every
/// component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The Discord guild (server) this bot operates in
    pub guild_id: u64,
    /// Staff role granting the Discord half of the privilege gate
    pub admin_role_id: u64,
    /// Category channel that support tickets are created under
    pub support_category_id: Option<u64>,
    /// Category channel that deposit/withdraw tickets are created under
    pub deposit_withdraw_category_id: Option<u64>,
    /// Community website users are pointed at from DMs
    pub website_url: Option<String>,
    /// HTTP API settings
    pub api: ApiConfig,
}

/// Settings for the HTTP façade.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port the API listens on
    pub port: u16,
    /// Requests allowed per caller IP per window
    pub rate_limit_max_requests: u32,
    /// Rate-limit window length in seconds
    pub rate_limit_window_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 15 * 60,
        }
    }
}

/// Raw shape of config.toml; every field optional so deployments can set
/// everything through the environment instead.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    guild_id: Option<u64>,
    admin_role_id: Option<u64>,
    support_category_id: Option<u64>,
    deposit_withdraw_category_id: Option<u64>,
    website_url: Option<String>,
    #[serde(default)]
    api: ApiFileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ApiFileConfig {
    port: Option<u16>,
    rate_limit_max_requests: Option<u32>,
    rate_limit_window_secs: Option<u64>,
}

/// Environment-variable overrides, gathered up front so resolution is a pure
/// function of (file, env) and testable without touching the process
/// environment.
#[derive(Debug, Default)]
struct EnvOverrides {
    guild_id: Option<u64>,
    admin_role_id: Option<u64>,
    support_category_id: Option<u64>,
    deposit_withdraw_category_id: Option<u64>,
    website_url: Option<String>,
    port: Option<u16>,
    rate_limit_max_requests: Option<u32>,
    rate_limit_window_secs: Option<u64>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self> {
        Ok(Self {
            guild_id: parse_env("DISCORD_GUILD_ID")?,
            admin_role_id: parse_env("ADMIN_ROLE_ID")?,
            support_category_id: parse_env("SUPPORT_CATEGORY_ID")?,
            deposit_withdraw_category_id: parse_env("DEPOSIT_WITHDRAW_CATEGORY_ID")?,
            website_url: std::env::var("WEBSITE_URL").ok().filter(|v| !v.is_empty()),
            port: parse_env("PORT")?,
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS")?,
            rate_limit_window_secs: parse_env("RATE_LIMIT_WINDOW_SECS")?,
        })
    }
}

/// Reads and parses an environment variable, treating unset or empty as absent.
fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map(Some).map_err(|_| Error::Config {
                message: format!("Invalid value for {name}: {value}"),
            })
        }
        _ => Ok(None),
    }
}

impl AppConfig {
    /// Loads configuration from `./config.toml` (if present) with environment
    /// variable overrides applied on top.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, if an
    /// override fails to parse, or if `guild_id`/`admin_role_id` are missing
    /// from both sources.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Loads configuration from a specific TOML file path plus the environment.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = read_file_config(path.as_ref())?;
        let env = EnvOverrides::from_env()?;
        resolve(file, env)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Merges file settings and environment overrides into the final config.
/// Environment wins; `guild_id` and `admin_role_id` must come from somewhere.
fn resolve(file: FileConfig, env: EnvOverrides) -> Result<AppConfig> {
    let defaults = ApiConfig::default();

    let guild_id = env
        .guild_id
        .or(file.guild_id)
        .ok_or_else(|| Error::Config {
            message: "DISCORD_GUILD_ID is not set (env or config.toml guild_id)".to_string(),
        })?;
    let admin_role_id = env
        .admin_role_id
        .or(file.admin_role_id)
        .ok_or_else(|| Error::Config {
            message: "ADMIN_ROLE_ID is not set (env or config.toml admin_role_id)".to_string(),
        })?;

    Ok(AppConfig {
        guild_id,
        admin_role_id,
        support_category_id: env.support_category_id.or(file.support_category_id),
        deposit_withdraw_category_id: env
            .deposit_withdraw_category_id
            .or(file.deposit_withdraw_category_id),
        website_url: env.website_url.or(file.website_url),
        api: ApiConfig {
            port: env.port.or(file.api.port).unwrap_or(defaults.port),
            rate_limit_max_requests: env
                .rate_limit_max_requests
                .or(file.api.rate_limit_max_requests)
                .unwrap_or(defaults.rate_limit_max_requests),
            rate_limit_window_secs: env
                .rate_limit_window_secs
                .or(file.api.rate_limit_window_secs)
                .unwrap_or(defaults.rate_limit_window_secs),
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config_file() {
        let toml_str = r#"
            guild_id = 111222333444555666
            admin_role_id = 222333444555666777
            support_category_id = 333444555666777888
            deposit_withdraw_category_id = 444555666777888999
            website_url = "https://example.com"

            [api]
            port = 4000
            rate_limit_max_requests = 50
            rate_limit_window_secs = 600
        "#;

        let file: FileConfig = toml::from_str(toml_str).unwrap();
        let config = resolve(file, EnvOverrides::default()).unwrap();

        assert_eq!(config.guild_id, 111_222_333_444_555_666);
        assert_eq!(config.admin_role_id, 222_333_444_555_666_777);
        assert_eq!(config.support_category_id, Some(333_444_555_666_777_888));
        assert_eq!(config.website_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.api.rate_limit_max_requests, 50);
        assert_eq!(config.api.rate_limit_window_secs, 600);
    }

    #[test]
    fn test_api_defaults_apply() {
        let toml_str = r"
            guild_id = 1
            admin_role_id = 2
        ";

        let file: FileConfig = toml::from_str(toml_str).unwrap();
        let config = resolve(file, EnvOverrides::default()).unwrap();

        assert_eq!(config.api.port, 3001);
        assert_eq!(config.api.rate_limit_max_requests, 100);
        assert_eq!(config.api.rate_limit_window_secs, 900);
        assert!(config.support_category_id.is_none());
        assert!(config.website_url.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str("guild_id = 1\nadmin_role_id = 2").unwrap();
        let env = EnvOverrides {
            guild_id: Some(99),
            port: Some(8080),
            ..Default::default()
        };

        let config = resolve(file, env).unwrap();
        assert_eq!(config.guild_id, 99);
        assert_eq!(config.admin_role_id, 2);
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn test_missing_guild_id_is_an_error() {
        let result = resolve(FileConfig::default(), EnvOverrides::default());
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
