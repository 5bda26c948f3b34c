//! Application configuration.
//!
//! Loaded once at startup from ~/.config/calbot/config.toml and passed by
//! reference to everything that needs it. Every field has a default, so a
//! missing file is not an error.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CalbotError, CalbotResult};

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// How many upcoming events to offer when deleting a single event
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Upper bound on events fetched by "delete all"
pub const DEFAULT_DELETE_ALL_LIMIT: usize = 2500;

const DEFAULT_EVENT_DURATION: &str = "1h";

/// On-disk shape of config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    calendar_id: Option<String>,
    timezone: Option<String>,
    credentials_path: Option<String>,
    token_path: Option<String>,
    upcoming_limit: Option<usize>,
    delete_all_limit: Option<usize>,
    event_duration: Option<String>,
    confirm_delete_all: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub calendar_id: String,
    pub timezone: Tz,
    /// Client-secret bundle downloaded from the Google Cloud console
    pub credentials_path: PathBuf,
    /// Cached OAuth tokens
    pub token_path: PathBuf,
    pub upcoming_limit: usize,
    pub delete_all_limit: usize,
    pub event_duration: Duration,
    pub confirm_delete_all: bool,
}

impl AppConfig {
    pub fn config_dir() -> CalbotResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| CalbotError::Config("Could not determine config directory".into()))?
            .join("calbot"))
    }

    pub fn config_path() -> CalbotResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load ~/.config/calbot/config.toml, falling back to defaults if it doesn't exist.
    pub fn load() -> CalbotResult<Self> {
        let path = Self::config_path()?;
        let base_dir = Self::config_dir()?;

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::from_toml("", &base_dir);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            CalbotError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&contents, &base_dir)
    }

    /// Build a config from TOML text. Relative default paths live in `base_dir`.
    pub fn from_toml(contents: &str, base_dir: &Path) -> CalbotResult<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| CalbotError::Config(e.to_string()))?;

        let timezone_name = file.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        let timezone = Tz::from_str(timezone_name).map_err(|_| {
            CalbotError::Config(format!("Unknown timezone '{}'", timezone_name))
        })?;

        let duration_text = file
            .event_duration
            .as_deref()
            .unwrap_or(DEFAULT_EVENT_DURATION);
        let event_duration = humantime::parse_duration(duration_text)
            .map_err(|e| {
                CalbotError::Config(format!("Invalid event_duration '{}': {e}", duration_text))
            })
            .and_then(|d| {
                Duration::from_std(d)
                    .map_err(|_| CalbotError::Config("event_duration is too large".into()))
            })?;

        if event_duration <= Duration::zero() {
            return Err(CalbotError::Config("event_duration must be positive".into()));
        }

        let credentials_path = match file.credentials_path {
            Some(p) => expand_path(&p)?,
            None => base_dir.join("credentials.json"),
        };

        let token_path = match file.token_path {
            Some(p) => expand_path(&p)?,
            None => base_dir.join("token.json"),
        };

        Ok(AppConfig {
            calendar_id: file
                .calendar_id
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            timezone,
            credentials_path,
            token_path,
            upcoming_limit: file.upcoming_limit.unwrap_or(DEFAULT_UPCOMING_LIMIT),
            delete_all_limit: file.delete_all_limit.unwrap_or(DEFAULT_DELETE_ALL_LIMIT),
            event_duration,
            confirm_delete_all: file.confirm_delete_all.unwrap_or(true),
        })
    }
}

fn expand_path(raw: &str) -> CalbotResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| CalbotError::Config(format!("Could not expand path '{}': {e}", raw)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
