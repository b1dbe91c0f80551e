use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, validate};
use crate::auth::session::{flash, get_user_id};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::user;
use crate::templates_structs::{AccountTemplate, PageContext};

#[derive(Deserialize)]
pub struct AccountForm {
    pub username: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: String,
    pub csrf_token: String,
}

async fn current_user(
    pool: &DbPool,
    session: &Session,
) -> Result<crate::models::user::User, AppError> {
    let user_id =
        get_user_id(session).ok_or_else(|| AppError::Session("Not logged in".to_string()))?;
    user::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// GET /account — current values, ready to edit.
pub async fn form(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let u = current_user(&pool, &session).await?;
    let ctx = PageContext::build(&session);
    render(AccountTemplate {
        ctx,
        errors: vec![],
        username: u.username,
        email: u.email,
        api_key: u.api_key,
        api_secret: u.api_secret,
    })
}

/// POST /account — overwrite username, email, and API credentials in place.
pub async fn submit(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<AccountForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let u = current_user(&pool, &session).await?;

    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_username(&username));
    errors.extend(validate::validate_email(&email));
    errors.extend(validate::validate_required(&form.api_key, "API key", 120));
    errors.extend(validate::validate_required(&form.api_secret, "API secret", 120));

    // Collisions only count against *other* users; keeping your own
    // username is not a conflict.
    if errors.is_empty() {
        if user::username_taken(&pool, &username, Some(u.id)).await? {
            errors.push("That username is taken, please choose a different one".to_string());
        }
        if user::email_taken(&pool, &email, Some(u.id)).await? {
            errors.push("That email is taken, please choose a different one".to_string());
        }
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(AccountTemplate {
            ctx,
            errors,
            username,
            email,
            api_key: form.api_key.clone(),
            api_secret: form.api_secret.clone(),
        });
    }

    user::update_account(
        &pool,
        u.id,
        &username,
        &email,
        form.api_key.trim(),
        form.api_secret.trim(),
    )
    .await?;

    // Keep the displayed name in sync when it changed.
    let _ = session.insert("username", &username);

    flash(&session, "Account updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/account"))
        .finish())
}
