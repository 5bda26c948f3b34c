//! User-provided OAuth client credentials.
//!
//! Accepts the JSON file the Google Cloud console hands out for "Desktop app"
//! or "Web application" clients, or a flat object with just the two fields.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretsFile {
    Installed { installed: ClientSecrets },
    Web { web: ClientSecrets },
    Flat(ClientSecrets),
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google client secrets not found.\n\n\
                Download an OAuth client (Desktop app) JSON file from\n\
                https://console.cloud.google.com/apis/credentials\n\
                and save it as {}",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read client secrets from {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse client secrets from {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(contents)?;

        Ok(match file {
            SecretsFile::Installed { installed } => installed,
            SecretsFile::Web { web } => web,
            SecretsFile::Flat(secrets) => secrets,
        })
    }
}
