//! The credential store: a cached OAuth token on disk, refreshed or
//! re-authorized when it stops being usable.

use std::path::Path;

use anyhow::{Context, Result};
use calbot_core::{AppConfig, CalbotError, CalbotResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app_config::ClientSecrets;
use crate::oauth::OAuthFlow;

/// Treat tokens this close to expiry as already expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// An OAuth token pair.
///
/// `token` and `expiry` are accepted on load so token files written by
/// Google's Python client can be reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, alias = "expiry")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + Duration::seconds(expires_in))
        } else {
            None
        };

        Credential {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() >= at - Duration::seconds(EXPIRY_SKEW_SECS))
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

pub struct CredentialStore<'a, F> {
    config: &'a AppConfig,
    flow: F,
}

impl<'a, F: OAuthFlow> CredentialStore<'a, F> {
    pub fn new(config: &'a AppConfig, flow: F) -> Self {
        CredentialStore { config, flow }
    }

    /// Return a usable credential, refreshing or re-authorizing as needed.
    /// Whatever comes back has already been written to the token file.
    pub async fn obtain_credential(&self) -> CalbotResult<Credential> {
        self.obtain().await.map_err(|e| CalbotError::AuthFailure(format!("{:#}", e)))
    }

    /// The client-secret bundle from the configured path.
    pub fn client_secrets(&self) -> Result<ClientSecrets> {
        ClientSecrets::load(&self.config.credentials_path)
    }

    async fn obtain(&self) -> Result<Credential> {
        let cached = self.load_cached();

        if let Some(credential) = &cached {
            if !credential.is_expired() {
                debug!("Using cached credential");
                return Ok(credential.clone());
            }
        }

        let secrets = self.client_secrets()?;

        if let Some(credential) = cached.filter(Credential::can_refresh) {
            info!("Access token expired, refreshing");
            match self.flow.refresh(&secrets, &credential).await {
                Ok(refreshed) => {
                    self.save(&refreshed)?;
                    return Ok(refreshed);
                }
                Err(e) => warn!(error = %format!("{:#}", e), "Refresh failed, re-authorizing"),
            }
        }

        let credential = self.flow.authorize(&secrets).await?;
        self.save(&credential)?;
        Ok(credential)
    }

    /// A missing or unreadable token file just means we start over.
    fn load_cached(&self) -> Option<Credential> {
        let path = &self.config.token_path;

        if !path.exists() {
            return None;
        }

        match read_credential(path) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{:#}", e), "Ignoring token file");
                None
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        write_credential(&self.config.token_path, credential)
    }
}

pub(crate) fn read_credential(path: &Path) -> Result<Credential> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse token from {}", path.display()))
}

pub(crate) fn write_credential(path: &Path, credential: &Credential) -> Result<()> {
    let contents =
        serde_json::to_string_pretty(credential).context("Failed to serialize token")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write token to {}", path.display()))?;

    // Set to owner-only (0600) since file contains OAuth tokens:
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}
