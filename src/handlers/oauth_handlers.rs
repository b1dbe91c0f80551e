//! Routes for the superseded OAuth variant. These only do anything when
//! client credentials are configured; the registration workflow itself
//! runs on the per-user API-key path.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::flash;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::zoom::{ZoomClient, oauth};

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/home"))
        .finish()
}

/// GET /zoom/authorize — step 1: send the user to the provider. Skips the
/// round trip when the session already holds a usable (or refreshable)
/// token pair.
pub async fn authorize(
    config: web::Data<AppConfig>,
    zoom: web::Data<ZoomClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let Some(cfg) = config.oauth.as_ref() else {
        flash(&session, "Zoom OAuth is not configured on this server.");
        return Ok(redirect_home());
    };

    match oauth::ensure_fresh(zoom.http(), cfg, &session).await {
        Ok(Some(_)) => {
            flash(&session, "Your Zoom account is already connected.");
            return Ok(redirect_home());
        }
        Ok(None) => {}
        Err(e) => {
            // A dead refresh token just means going through the flow again.
            log::warn!("Token refresh failed, restarting authorization: {e}");
        }
    }

    let url = oauth::authorize_url(cfg)?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", url))
        .finish())
}

/// GET /zoom/callback — steps 2 and 3: receive the authorization code and
/// exchange it for tokens stored in the session.
pub async fn callback(
    config: web::Data<AppConfig>,
    zoom: web::Data<ZoomClient>,
    session: Session,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(cfg) = config.oauth.as_ref() else {
        flash(&session, "Zoom OAuth is not configured on this server.");
        return Ok(redirect_home());
    };

    if let Some(err) = &query.error {
        flash(&session, &format!("Zoom authorization was declined: {err}"));
        return Ok(redirect_home());
    }

    let Some(code) = &query.code else {
        flash(&session, "Zoom did not return an authorization code.");
        return Ok(redirect_home());
    };

    let pair = oauth::exchange_code(zoom.http(), cfg, code).await?;
    oauth::store_tokens(&session, &pair);

    flash(&session, "Your Zoom account is connected.");
    Ok(redirect_home())
}
