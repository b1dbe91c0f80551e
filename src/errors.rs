use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Template(askama::Error),
    Hash(String),
    Session(String),
    Forbidden(String),
    /// Upstream Zoom API failure (transport error or unusable credentials).
    Adapter(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Forbidden(e) => write!(f, "Forbidden: {e}"),
            AppError::Adapter(e) => write!(f, "Zoom API error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().body("Not Found"),
            AppError::Forbidden(_) => HttpResponse::Forbidden().body("Forbidden"),
            AppError::Adapter(msg) => {
                log::warn!("Upstream Zoom failure: {msg}");
                HttpResponse::BadGateway()
                    .body(format!("The meeting service reported an error: {msg}"))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an Askama template into a 200 HTML response.
pub fn render<T: askama::Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
