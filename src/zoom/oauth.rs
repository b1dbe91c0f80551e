//! Superseded OAuth token flow. The per-user API-key path (see
//! [`super::jwt`]) is what the registration workflow uses; this module is
//! only wired up when `ZOOM_CLIENT_ID`/`ZOOM_CLIENT_SECRET` are configured,
//! and the two paths are never combined.

use actix_session::Session;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::OauthConfig;

use super::client::AdapterError;

const SESSION_KEY: &str = "zoom_tokens";

/// Treat tokens as expired slightly early so an in-flight call never
/// carries a token that dies mid-request.
const EXPIRY_SLACK_SECS: i64 = 60;

/// Access/refresh token pair held in the session, with an absolute expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl TokenPair {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

impl TokenResponse {
    fn into_pair(self) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now().timestamp() + self.expires_in - EXPIRY_SLACK_SECS,
        }
    }
}

/// Step 1: the URL the user is sent to for authorization.
pub fn authorize_url(cfg: &OauthConfig) -> Result<String, AdapterError> {
    let url = reqwest::Url::parse_with_params(
        &cfg.authorize_url,
        &[
            ("response_type", "code"),
            ("client_id", cfg.client_id.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
        ],
    )
    .map_err(|e| AdapterError::Token(format!("bad authorize URL: {e}")))?;
    Ok(url.to_string())
}

/// Step 3: exchange the callback code for a token pair.
pub async fn exchange_code(
    http: &reqwest::Client,
    cfg: &OauthConfig,
    code: &str,
) -> Result<TokenPair, AdapterError> {
    request_tokens(
        http,
        cfg,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", cfg.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Refresh-token grant, run lazily when the stored pair has expired.
pub async fn refresh(
    http: &reqwest::Client,
    cfg: &OauthConfig,
    refresh_token: &str,
) -> Result<TokenPair, AdapterError> {
    request_tokens(
        http,
        cfg,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_tokens(
    http: &reqwest::Client,
    cfg: &OauthConfig,
    params: &[(&str, &str)],
) -> Result<TokenPair, AdapterError> {
    let response = http
        .post(&cfg.token_url)
        .basic_auth(&cfg.client_id, Some(&cfg.client_secret))
        .form(params)
        .send()
        .await
        .map_err(AdapterError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdapterError::Upstream {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    let parsed: TokenResponse = response.json().await.map_err(AdapterError::Transport)?;
    Ok(parsed.into_pair())
}

pub fn store_tokens(session: &Session, pair: &TokenPair) {
    let _ = session.insert(SESSION_KEY, pair);
}

pub fn load_tokens(session: &Session) -> Option<TokenPair> {
    session.get::<TokenPair>(SESSION_KEY).unwrap_or(None)
}

/// Return a usable token pair from the session, refreshing it first when
/// expired. None when the user never completed the authorization flow.
pub async fn ensure_fresh(
    http: &reqwest::Client,
    cfg: &OauthConfig,
    session: &Session,
) -> Result<Option<TokenPair>, AdapterError> {
    let Some(pair) = load_tokens(session) else {
        return Ok(None);
    };
    if !pair.is_expired() {
        return Ok(Some(pair));
    }
    let refreshed = refresh(http, cfg, &pair.refresh_token).await?;
    store_tokens(session, &refreshed);
    Ok(Some(refreshed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OauthConfig {
        OauthConfig {
            client_id: "client123".to_string(),
            client_secret: "secret456".to_string(),
            authorize_url: "https://zoom.us/oauth/authorize".to_string(),
            token_url: "https://zoom.us/oauth/token".to_string(),
            redirect_uri: "http://127.0.0.1:8080/zoom/callback".to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_client_and_redirect() {
        let url = authorize_url(&test_config()).expect("Failed to build URL");
        assert!(url.starts_with("https://zoom.us/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2Fzoom%2Fcallback"));
    }

    #[test]
    fn token_response_sets_absolute_expiry() {
        let response = TokenResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in: 3600,
        };
        let pair = response.into_pair();
        assert!(!pair.is_expired());
        let remaining = pair.expires_at - Utc::now().timestamp();
        assert!(remaining > 3000 && remaining <= 3600 - EXPIRY_SLACK_SECS);
    }

    #[test]
    fn expired_pair_reports_expired() {
        let pair = TokenPair {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: Utc::now().timestamp() - 1,
        };
        assert!(pair.is_expired());
    }
}
