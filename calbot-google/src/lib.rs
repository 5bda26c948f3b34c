//! Google Calendar provider for calbot.
//!
//! Credentials and tokens are stored in:
//!   ~/.config/calbot/credentials.json (client secrets, downloaded by the user)
//!   ~/.config/calbot/token.json (written by us)

pub mod app_config;
pub mod gateway;
pub mod google_event;
pub mod oauth;
pub mod session;

#[cfg(test)]
mod testing;

pub use app_config::ClientSecrets;
pub use gateway::GoogleGateway;
pub use oauth::{GoogleOAuth, OAuthFlow};
pub use session::{Credential, CredentialStore};
