/// Environment-supplied configuration, loaded once at startup and shared
/// with handlers via `web::Data`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub zoom_api_base: String,
    /// Present only when the superseded OAuth flow is configured.
    pub oauth: Option<OauthConfig>,
}

/// Client credentials and endpoints for the OAuth code/token exchange.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/zoomforms.db".to_string());
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let zoom_api_base = std::env::var("ZOOM_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.zoom.us/v2".to_string());

        let oauth = match (
            std::env::var("ZOOM_CLIENT_ID"),
            std::env::var("ZOOM_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) => {
                let authorize_url = std::env::var("ZOOM_AUTHORIZE_URL")
                    .unwrap_or_else(|_| "https://zoom.us/oauth/authorize".to_string());
                let token_url = std::env::var("ZOOM_TOKEN_URL")
                    .unwrap_or_else(|_| "https://zoom.us/oauth/token".to_string());
                let redirect_uri = std::env::var("ZOOM_REDIRECT_URI")
                    .unwrap_or_else(|_| "http://127.0.0.1:8080/zoom/callback".to_string());
                Some(OauthConfig {
                    client_id,
                    client_secret,
                    authorize_url,
                    token_url,
                    redirect_uri,
                })
            }
            _ => None,
        };

        AppConfig {
            database_url,
            bind_addr,
            zoom_api_base,
            oauth,
        }
    }
}
