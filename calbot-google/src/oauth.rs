//! OAuth flows against Google's authorization server.
//!
//! The interactive flow opens the consent page in a browser and catches the
//! redirect on a throwaway localhost port. Refreshing needs no user at all.

use anyhow::{Context, Result};
use google_calendar::{AccessToken, Client};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::app_config::ClientSecrets;
use crate::session::Credential;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// How the credential store gets new tokens. Stubbed in tests.
#[allow(async_fn_in_trait)]
pub trait OAuthFlow {
    /// Ask the user to grant access. May block on user interaction.
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential>;

    /// Trade a refresh token for a new access token, silently.
    async fn refresh(&self, secrets: &ClientSecrets, credential: &Credential) -> Result<Credential>;
}

/// Browser consent with a loopback redirect, as Google recommends for desktop apps.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoogleOAuth;

impl OAuthFlow for GoogleOAuth {
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential> {
        // Port 0: let the OS pick; loopback redirects may use any port.
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind OAuth callback listener")?;
        let port = listener
            .local_addr()
            .context("Failed to read OAuth callback address")?
            .port();
        let redirect_uri = format!("http://localhost:{}/callback", port);

        let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();

        let mut client = Client::new(
            secrets.client_id.clone(),
            secrets.client_secret.clone(),
            redirect_uri,
            String::new(),
            String::new(),
        );

        let auth_url = client.user_consent_url(&scopes);

        eprintln!("\nOpen this URL in your browser to authenticate:\n");
        eprintln!("{}\n", auth_url);

        if open::that(&auth_url).is_err() {
            eprintln!("(Could not open browser automatically, please copy the URL above)");
        }

        let (code, state) = wait_for_callback(listener).await?;

        debug!("Received authorization code, exchanging for tokens");

        let access_token = client
            .get_access_token(&code, &state)
            .await
            .context("Failed to exchange authorization code for tokens")?;

        info!("Authorization granted");

        Ok(credential_from_token(access_token, None))
    }

    async fn refresh(&self, secrets: &ClientSecrets, credential: &Credential) -> Result<Credential> {
        let client = Client::new(
            secrets.client_id.clone(),
            secrets.client_secret.clone(),
            String::new(),
            credential.access_token.clone(),
            credential.refresh_token.clone(),
        );

        let access_token = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        Ok(credential_from_token(access_token, Some(&credential.refresh_token)))
    }
}

/// Google typically doesn't return a new refresh token on refresh; keep the old one.
fn credential_from_token(token: AccessToken, previous_refresh: Option<&str>) -> Credential {
    let refresh_token = match previous_refresh {
        Some(previous) if token.refresh_token.is_empty() => previous.to_string(),
        _ => token.refresh_token,
    };

    Credential::new(token.access_token, refresh_token, token.expires_in)
}

async fn wait_for_callback(listener: TcpListener) -> Result<(String, String)> {
    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let outcome = parse_callback(&request_line);

    let body = match &outcome {
        Ok(_) => "<h1>Authentication successful!</h1>\
            <p>You can close this window and return to the terminal.</p>",
        Err(_) => "<h1>Authentication failed</h1>\
            <p>Return to the terminal for details.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>{}</body></html>",
        body
    );

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    outcome
}

/// Pull `code` and `state` out of `GET /callback?code=..&state=.. HTTP/1.1`.
/// A denied consent comes back as `?error=access_denied`.
fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    let query = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = query("error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = query("code").ok_or_else(|| anyhow::anyhow!("No code in callback"))?;
    let state = query("state").ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

    Ok((code, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_with_code_and_state() {
        let (code, state) =
            parse_callback("GET /callback?state=xyz&code=4%2Fabc HTTP/1.1\r\n").unwrap();
        assert_eq!(code, "4/abc");
        assert_eq!(state, "xyz");
    }

    #[test]
    fn denied_consent_is_an_error() {
        let err = parse_callback("GET /callback?error=access_denied HTTP/1.1").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn garbage_request_is_an_error() {
        assert!(parse_callback("\r\n").is_err());
        assert!(parse_callback("GET /callback?state=only HTTP/1.1").is_err());
    }
}
