//! Test doubles shared by the session and gateway tests.

use std::cell::Cell;
use std::path::PathBuf;

use anyhow::Result;
use calbot_core::AppConfig;
use chrono::{Duration, Utc};

use crate::app_config::ClientSecrets;
use crate::oauth::OAuthFlow;
use crate::session::{Credential, read_credential, write_credential};

#[derive(Default)]
pub struct StubFlow {
    pub authorize_calls: Cell<u32>,
    pub refresh_calls: Cell<u32>,
    pub deny: bool,
    pub fail_refresh: bool,
}

impl OAuthFlow for &StubFlow {
    async fn authorize(&self, _secrets: &ClientSecrets) -> Result<Credential> {
        self.authorize_calls.set(self.authorize_calls.get() + 1);
        if self.deny {
            anyhow::bail!("Authorization was denied: access_denied");
        }
        Ok(Credential::new("fresh".into(), "refresh-1".into(), 3600))
    }

    async fn refresh(&self, _secrets: &ClientSecrets, credential: &Credential) -> Result<Credential> {
        self.refresh_calls.set(self.refresh_calls.get() + 1);
        if self.fail_refresh {
            anyhow::bail!("invalid_grant");
        }
        Ok(Credential::new(
            "refreshed".into(),
            credential.refresh_token.clone(),
            3600,
        ))
    }
}

/// A config rooted in a temp dir, optionally with a client-secrets file.
pub struct Fixture {
    _dir: tempfile::TempDir,
    pub config: AppConfig,
}

impl Fixture {
    pub fn new(with_secrets: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_toml("", dir.path()).unwrap();
        if with_secrets {
            std::fs::write(
                &config.credentials_path,
                r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
            )
            .unwrap();
        }
        Fixture { _dir: dir, config }
    }

    pub fn token_path(&self) -> &PathBuf {
        &self.config.token_path
    }

    pub fn write_token(&self, credential: &Credential) {
        write_credential(self.token_path(), credential).unwrap();
    }

    pub fn saved_token(&self) -> Credential {
        read_credential(self.token_path()).unwrap()
    }
}

pub fn expired() -> Credential {
    Credential {
        access_token: "stale".into(),
        refresh_token: "refresh-0".into(),
        expires_at: Some(Utc::now() - Duration::hours(1)),
    }
}
