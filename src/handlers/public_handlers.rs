//! Public registration flow: anyone with the link can view an active form
//! and sign up. Submissions are forwarded to Zoom under the form owner's
//! credentials before anything is persisted.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, validate};
use crate::auth::session::flash;
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::registrant::{self, NewRegistrant};
use crate::models::{meeting_form, user};
use crate::templates_structs::{PageContext, PublicFormTemplate, RegisterCompleteTemplate};
use crate::zoom::ZoomClient;
use crate::zoom::client::{ApiCredentials, RegistrantPayload};

#[derive(Deserialize)]
pub struct RegistrationForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub address: String,
    pub csrf_token: String,
}

fn not_available(session: &Session) -> HttpResponse {
    flash(session, "This form is not available to fill out anymore.");
    HttpResponse::SeeOther()
        .insert_header(("Location", "/home"))
        .finish()
}

/// GET /meetingforms/{id}/view — the public registration page.
pub async fn view(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let form = meeting_form::find_by_id(&pool, form_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !form.active {
        return Ok(not_available(&session));
    }

    let ctx = PageContext::build(&session);
    render(PublicFormTemplate {
        ctx,
        form_id,
        form_name: form.meeting_form_name,
        errors: vec![],
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        job_title: String::new(),
        address: String::new(),
    })
}

/// POST /meetingforms/{id}/view — duplicate-check, forward to Zoom, then
/// persist. Nothing is written when Zoom rejects the registrant.
pub async fn submit(
    pool: web::Data<DbPool>,
    zoom: web::Data<ZoomClient>,
    session: Session,
    path: web::Path<i64>,
    submission: web::Form<RegistrationForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &submission.csrf_token)?;

    let form_id = path.into_inner();
    let form = meeting_form::find_by_id(&pool, form_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !form.active {
        return Ok(not_available(&session));
    }

    let email = submission.email.trim().to_string();
    let first_name = submission.first_name.trim().to_string();
    let last_name = submission.last_name.trim().to_string();

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_email(&email));
    errors.extend(validate::validate_required(&first_name, "First name", 50));
    errors.extend(validate::validate_required(&last_name, "Last name", 50));
    errors.extend(validate::validate_optional(&submission.job_title, "Job title", 50));
    errors.extend(validate::validate_optional(&submission.address, "Address", 50));

    // One email per external meeting, across every form that points at it.
    if errors.is_empty()
        && registrant::exists_for_meeting(&pool, form.meeting_id, &email).await?
    {
        errors.push("You have already signed up for this meeting.".to_string());
    }

    fn rerender(
        session: &Session,
        form_id: i64,
        form_name: &str,
        errors: Vec<String>,
        submission: &RegistrationForm,
    ) -> Result<HttpResponse, AppError> {
        let ctx = PageContext::build(session);
        render(PublicFormTemplate {
            ctx,
            form_id,
            form_name: form_name.to_string(),
            errors,
            email: submission.email.trim().to_string(),
            first_name: submission.first_name.trim().to_string(),
            last_name: submission.last_name.trim().to_string(),
            job_title: submission.job_title.clone(),
            address: submission.address.clone(),
        })
    }

    if !errors.is_empty() {
        return rerender(&session, form_id, &form.meeting_form_name, errors, &submission);
    }

    // Forward to Zoom under the owner's credentials.
    let owner = user::find_by_id(&pool, form.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let creds = ApiCredentials::from(&owner);

    let job_title = submission.job_title.trim();
    let address = submission.address.trim();
    let payload = RegistrantPayload {
        email: &email,
        first_name: &first_name,
        last_name: &last_name,
        job_title: (!job_title.is_empty()).then_some(job_title),
        address: (!address.is_empty()).then_some(address),
    };

    let response = zoom
        .register_for_meeting(&creds, form.meeting_id, &payload)
        .await?;

    if !response.is_success() {
        log::warn!(
            "Zoom rejected registrant for meeting {}: {:?} {:?}",
            form.meeting_id,
            response.code,
            response.message
        );
        return rerender(
            &session,
            form_id,
            &form.meeting_form_name,
            vec![response.error_message()],
            &submission,
        );
    }

    let new = NewRegistrant {
        email,
        first_name,
        last_name,
        address: (!address.is_empty()).then(|| address.to_string()),
        job_title: (!job_title.is_empty()).then(|| job_title.to_string()),
    };
    registrant::create(&pool, form_id, &new).await?;

    render(RegisterCompleteTemplate {
        meeting_form_name: form.meeting_form_name,
    })
}
