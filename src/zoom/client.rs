use serde::Deserialize;
use std::fmt;

use crate::errors::AppError;
use crate::models::user::User;

use super::jwt;

/// Per-user Zoom API credentials, as stored on the account.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl From<&User> for ApiCredentials {
    fn from(user: &User) -> Self {
        ApiCredentials {
            api_key: user.api_key.clone(),
            api_secret: user.api_secret.clone(),
        }
    }
}

/// Upstream failure: transport, credential, or an HTTP-level rejection the
/// API did not explain. Application-level result codes are NOT errors here;
/// callers read them off the parsed response.
#[derive(Debug)]
pub enum AdapterError {
    Transport(reqwest::Error),
    Token(String),
    Upstream { status: u16, message: String },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Transport(e) => write!(f, "request failed: {e}"),
            AdapterError::Token(e) => write!(f, "could not build auth token: {e}"),
            AdapterError::Upstream { status, message } => {
                write!(f, "upstream returned {status}: {message}")
            }
        }
    }
}

impl From<AdapterError> for AppError {
    fn from(e: AdapterError) -> Self {
        AppError::Adapter(e.to_string())
    }
}

/// One meeting as returned by "list my meetings".
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingSummary {
    pub id: i64,
    pub topic: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub join_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeetingListResponse {
    #[serde(default)]
    meetings: Vec<MeetingSummary>,
}

/// Error body shape Zoom uses for rejected requests.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Parsed add-registrant response. Zoom signals application-level failure
/// with a non-zero `code` in the body, separate from the HTTP status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub registrant_id: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
}

impl RegistrationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.code, None | Some(0))
    }

    pub fn error_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Registration was rejected by the meeting service".to_string())
    }
}

/// Fields forwarded to the add-registrant endpoint.
pub struct RegistrantPayload<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub job_title: Option<&'a str>,
    pub address: Option<&'a str>,
}

/// Thin wrapper over Zoom's REST API. No retries: upstream errors surface
/// once and the request fails independently.
#[derive(Debug, Clone)]
pub struct ZoomClient {
    http: reqwest::Client,
    base_url: String,
}

impl ZoomClient {
    pub fn new(base_url: &str) -> Self {
        ZoomClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The underlying HTTP client, shared with the OAuth token exchange.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// GET /users/me/meetings — meetings owned by the credential.
    pub async fn list_meetings(
        &self,
        creds: &ApiCredentials,
    ) -> Result<Vec<MeetingSummary>, AdapterError> {
        let token = jwt::sign(&creds.api_key, &creds.api_secret).map_err(AdapterError::Token)?;
        let response = self
            .http
            .get(format!("{}/users/me/meetings", self.base_url))
            .bearer_auth(token)
            .query(&[("type", "upcoming"), ("page_size", "100")])
            .send()
            .await
            .map_err(AdapterError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AdapterError::Transport)?;

        if !status.is_success() {
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let parsed: MeetingListResponse =
            serde_json::from_str(&body).map_err(|e| AdapterError::Upstream {
                status: status.as_u16(),
                message: format!("unparseable meeting list: {e}"),
            })?;
        Ok(parsed.meetings)
    }

    /// POST /meetings/{id}/registrants — forward one registrant. The parsed
    /// body is returned even when it carries an application-level failure
    /// code; only transport-level problems become errors.
    pub async fn register_for_meeting(
        &self,
        creds: &ApiCredentials,
        meeting_id: i64,
        registrant: &RegistrantPayload<'_>,
    ) -> Result<RegistrationResponse, AdapterError> {
        let token = jwt::sign(&creds.api_key, &creds.api_secret).map_err(AdapterError::Token)?;

        let mut payload = serde_json::json!({
            "email": registrant.email,
            "first_name": registrant.first_name,
            "last_name": registrant.last_name,
        });
        if let Some(job_title) = registrant.job_title {
            payload["job_title"] = serde_json::Value::from(job_title);
        }
        if let Some(address) = registrant.address {
            payload["address"] = serde_json::Value::from(address);
        }

        let response = self
            .http
            .post(format!("{}/meetings/{meeting_id}/registrants", self.base_url))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(AdapterError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AdapterError::Transport)?;

        match serde_json::from_str::<RegistrationResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if status.is_success() => Ok(RegistrationResponse::default()),
            Err(e) => Err(AdapterError::Upstream {
                status: status.as_u16(),
                message: format!("unparseable response: {e}"),
            }),
        }
    }
}

/// Pull the human-readable message out of an upstream error body, falling
/// back to the raw text.
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<UpstreamErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed
                .message
                .unwrap_or_else(|| "no message provided".to_string());
            match parsed.code {
                Some(code) => format!("{message} (code {code})"),
                None => message,
            }
        }
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_list_parses_zoom_shape() {
        let body = r#"{
            "page_size": 30,
            "total_records": 2,
            "meetings": [
                {"id": 86253472890, "topic": "Weekly sync", "start_time": "2024-03-01T10:00:00Z", "duration": 60},
                {"id": 99887766554, "topic": "Launch review"}
            ]
        }"#;
        let parsed: MeetingListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.meetings.len(), 2);
        assert_eq!(parsed.meetings[0].id, 86253472890);
        assert_eq!(parsed.meetings[1].topic, "Launch review");
        assert!(parsed.meetings[1].start_time.is_none());
    }

    #[test]
    fn registration_success_body_is_success() {
        let body = r#"{"registrant_id": "abc123", "join_url": "https://zoom.us/j/1"}"#;
        let parsed: RegistrationResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.registrant_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn registration_failure_code_is_reported() {
        let body = r#"{"code": 3001, "message": "Meeting does not exist."}"#;
        let parsed: RegistrationResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(parsed.error_message(), "Meeting does not exist.");
    }

    #[test]
    fn upstream_message_prefers_structured_body() {
        let msg = upstream_message(r#"{"code": 124, "message": "Invalid access token."}"#);
        assert_eq!(msg, "Invalid access token. (code 124)");

        let fallback = upstream_message("<html>Bad Gateway</html>");
        assert!(fallback.contains("Bad Gateway"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ZoomClient::new("https://api.zoom.us/v2/");
        assert_eq!(client.base_url, "https://api.zoom.us/v2");
    }
}
