//! Shared configuration for the sitecrew CLI.
//!
//! TOML config file, `SITECREW_`-prefixed environment overrides, and
//! credential resolution (env var + plaintext). Translates a loaded config
//! into ready-to-use `sitecrew_api` clients.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitecrew_api::{PostgrestClient, SheetsClient, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for the {backend} backend")]
    NoCredentials { backend: &'static str },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("client construction failed: {0}")]
    Client(#[from] sitecrew_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Which store implementation backs the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process maps; state is lost on exit. For demos and tests.
    #[default]
    Memory,
    /// Google Sheets spreadsheet, one tab per entity.
    Sheets,
    /// PostgREST endpoint (Supabase), one table per entity.
    Postgrest,
}

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub sheets: SheetsProfile,

    #[serde(default)]
    pub postgrest: PostgrestProfile,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    sitecrew_api::DEFAULT_TIMEOUT_SECS
}

/// Google Sheets backend settings.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SheetsProfile {
    /// Spreadsheet ID from the sheet's URL.
    pub spreadsheet_id: Option<String>,

    /// API key (plaintext — prefer `SITECREW_SHEETS_API_KEY`).
    pub api_key: Option<String>,
}

/// PostgREST backend settings.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PostgrestProfile {
    /// Endpoint base URL (e.g., "https://xyz.supabase.co/rest/v1").
    pub url: Option<String>,

    /// Service key (plaintext — prefer `SITECREW_POSTGREST_KEY`).
    pub key: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "dujon", "sitecrew").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sitecrew");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Precedence, lowest to highest: built-in defaults, the TOML file, then
/// `SITECREW_`-prefixed environment variables (`SITECREW_BACKEND`,
/// `SITECREW_SHEETS__SPREADSHEET_ID`; double underscore nests a section).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &PathBuf) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SITECREW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the Sheets API key: env var first, then the config file.
pub fn resolve_sheets_key(profile: &SheetsProfile) -> Result<SecretString, ConfigError> {
    if let Ok(val) = std::env::var("SITECREW_SHEETS_API_KEY") {
        return Ok(SecretString::from(val));
    }
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }
    Err(ConfigError::NoCredentials { backend: "sheets" })
}

/// Resolve the PostgREST service key: env var first, then the config file.
pub fn resolve_postgrest_key(profile: &PostgrestProfile) -> Result<SecretString, ConfigError> {
    if let Ok(val) = std::env::var("SITECREW_POSTGREST_KEY") {
        return Ok(SecretString::from(val));
    }
    if let Some(ref key) = profile.key {
        return Ok(SecretString::from(key.clone()));
    }
    Err(ConfigError::NoCredentials {
        backend: "postgrest",
    })
}

// ── Client construction ─────────────────────────────────────────────

fn transport(cfg: &Config) -> TransportConfig {
    TransportConfig {
        timeout: Duration::from_secs(cfg.defaults.timeout),
        ..TransportConfig::default()
    }
}

/// Build a [`SheetsClient`] from the loaded config.
pub fn sheets_client(cfg: &Config) -> Result<SheetsClient, ConfigError> {
    let spreadsheet_id =
        cfg.sheets
            .spreadsheet_id
            .clone()
            .ok_or_else(|| ConfigError::Validation {
                field: "sheets.spreadsheet_id".into(),
                reason: "required for the sheets backend".into(),
            })?;
    let key = resolve_sheets_key(&cfg.sheets)?;
    Ok(SheetsClient::new(&spreadsheet_id, key, &transport(cfg))?)
}

/// Build a [`PostgrestClient`] from the loaded config.
pub fn postgrest_client(cfg: &Config) -> Result<PostgrestClient, ConfigError> {
    let raw_url = cfg
        .postgrest
        .url
        .clone()
        .ok_or_else(|| ConfigError::Validation {
            field: "postgrest.url".into(),
            reason: "required for the postgrest backend".into(),
        })?;
    raw_url
        .parse::<url::Url>()
        .map_err(|_| ConfigError::Validation {
            field: "postgrest.url".into(),
            reason: format!("invalid URL: {raw_url}"),
        })?;
    let key = resolve_postgrest_key(&cfg.postgrest)?;
    Ok(PostgrestClient::new(&raw_url, &key, &transport(cfg))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_the_memory_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.backend, Backend::Memory);
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, sitecrew_api::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn toml_file_selects_backend_and_profile() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    backend = "sheets"

                    [sheets]
                    spreadsheet_id = "1abcDEF"
                    api_key = "k-123"
                "#,
            )?;
            let cfg = load_config_from(&PathBuf::from("config.toml")).unwrap();
            assert_eq!(cfg.backend, Backend::Sheets);
            assert_eq!(cfg.sheets.spreadsheet_id.as_deref(), Some("1abcDEF"));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "backend = \"sheets\"\n")?;
            jail.set_env("SITECREW_BACKEND", "postgrest");
            let cfg = load_config_from(&PathBuf::from("config.toml")).unwrap();
            assert_eq!(cfg.backend, Backend::Postgrest);
            Ok(())
        });
    }

    #[test]
    fn missing_credentials_are_a_dedicated_error() {
        let err = resolve_sheets_key(&SheetsProfile::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoCredentials { backend: "sheets" }
        ));
    }

    #[test]
    fn sheets_client_requires_a_spreadsheet_id() {
        let cfg = Config {
            backend: Backend::Sheets,
            sheets: SheetsProfile {
                spreadsheet_id: None,
                api_key: Some("k".into()),
            },
            ..Config::default()
        };
        let err = sheets_client(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
