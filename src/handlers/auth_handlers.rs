use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, password, validate};
use crate::auth::session::{establish, flash, get_user_id};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::user::{self, NewUser};
use crate::templates_structs::{LoginTemplate, PageContext, RegisterTemplate};

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub api_key: String,
    pub api_secret: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
    pub csrf_token: String,
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/home"))
        .finish()
}

pub async fn register_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(redirect_home());
    }
    let ctx = PageContext::build(&session);
    render(RegisterTemplate {
        ctx,
        errors: vec![],
        username: String::new(),
        email: String::new(),
        api_key: String::new(),
        api_secret: String::new(),
    })
}

pub async fn register_submit(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if get_user_id(&session).is_some() {
        return Ok(redirect_home());
    }

    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_username(&username));
    errors.extend(validate::validate_email(&email));
    errors.extend(validate::validate_password(&form.password));
    if form.password != form.confirm_password {
        errors.push("Passwords do not match".to_string());
    }
    errors.extend(validate::validate_required(&form.api_key, "API key", 120));
    errors.extend(validate::validate_required(&form.api_secret, "API secret", 120));

    if errors.is_empty() {
        if user::username_taken(&pool, &username, None).await? {
            errors.push("That username is taken, please choose a different one".to_string());
        }
        if user::email_taken(&pool, &email, None).await? {
            errors.push("That email is taken, please choose a different one".to_string());
        }
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(RegisterTemplate {
            ctx,
            errors,
            username,
            email,
            api_key: form.api_key.clone(),
            api_secret: form.api_secret.clone(),
        });
    }

    let hash = password::hash_password(&form.password).map_err(AppError::Hash)?;
    let new_user = NewUser {
        username,
        email,
        password: hash,
        api_key: form.api_key.trim().to_string(),
        api_secret: form.api_secret.trim().to_string(),
    };
    user::create(&pool, &new_user).await?;

    flash(&session, "Your account has been created. You can now log in.");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(redirect_home());
    }
    let ctx = PageContext::build(&session);
    render(LoginTemplate {
        ctx,
        error: None,
        email: String::new(),
    })
}

pub async fn login_submit(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if get_user_id(&session).is_some() {
        return Ok(redirect_home());
    }

    let email = form.email.trim();
    let found = user::find_by_email(&pool, email).await?;

    let matched = found.filter(|u| {
        password::verify_password(&form.password, &u.password).unwrap_or(false)
    });

    match matched {
        Some(u) => {
            let remember = form.remember.is_some();
            establish(&session, u.id, &u.username, remember);
            flash(&session, "Login successful");
            Ok(redirect_home())
        }
        None => {
            let ctx = PageContext::build(&session);
            render(LoginTemplate {
                ctx,
                error: Some("Login unsuccessful. Please check email and password".to_string()),
                email: email.to_string(),
            })
        }
    }
}

/// Clears the session identity unconditionally; safe for both GET and POST.
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(redirect_home())
}
