//! Owner-side meeting form workflow: create, inspect, toggle.

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, validate};
use crate::auth::session::{flash, get_user_id};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::{meeting_form, registrant, user};
use crate::templates_structs::{CreateFormTemplate, MeetingFormTemplate, PageContext};
use crate::zoom::ZoomClient;
use crate::zoom::client::{ApiCredentials, MeetingSummary};

#[derive(Deserialize)]
pub struct CreateForm {
    pub meeting_id: String,
    pub meeting_form_name: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// Owner gate shared by the detail and toggle routes: any user other than
/// the form's creator is rejected, whatever state the form is in.
pub fn ensure_owner(form: &meeting_form::MeetingForm, user_id: i64) -> Result<(), AppError> {
    if form.user_id != user_id {
        return Err(AppError::Forbidden(format!(
            "User {user_id} does not own form {}",
            form.id
        )));
    }
    Ok(())
}

async fn owner_credentials(
    pool: &DbPool,
    session: &Session,
) -> Result<(i64, ApiCredentials), AppError> {
    let user_id =
        get_user_id(session).ok_or_else(|| AppError::Session("Not logged in".to_string()))?;
    let u = user::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((user_id, ApiCredentials::from(&u)))
}

/// Fetch the owner's live meeting list, folded into (meetings, error
/// message) for the create page — a failed fetch still renders the page.
async fn live_meetings(
    zoom: &ZoomClient,
    creds: &ApiCredentials,
) -> (Vec<MeetingSummary>, Option<String>) {
    match zoom.list_meetings(creds).await {
        Ok(meetings) => (meetings, None),
        Err(e) => {
            log::warn!("Could not list Zoom meetings: {e}");
            (vec![], Some(format!("Could not load your Zoom meetings: {e}")))
        }
    }
}

/// GET /meetingforms/create — blank form plus the owner's live meetings.
pub async fn create_page(
    pool: web::Data<DbPool>,
    zoom: web::Data<ZoomClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let (_, creds) = owner_credentials(&pool, &session).await?;
    let (meetings, meetings_error) = live_meetings(&zoom, &creds).await;

    let ctx = PageContext::build(&session);
    render(CreateFormTemplate {
        ctx,
        errors: vec![],
        meetings,
        meetings_error,
        meeting_id: String::new(),
        meeting_form_name: String::new(),
    })
}

/// GET /meetingforms/create/{meeting_id}/{meeting_name} — same page,
/// pre-filled from a meeting picked off the live list.
pub async fn create_page_prefilled(
    pool: web::Data<DbPool>,
    zoom: web::Data<ZoomClient>,
    session: Session,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, AppError> {
    let (meeting_id, meeting_name) = path.into_inner();
    let (_, creds) = owner_credentials(&pool, &session).await?;
    let (meetings, meetings_error) = live_meetings(&zoom, &creds).await;

    let ctx = PageContext::build(&session);
    render(CreateFormTemplate {
        ctx,
        errors: vec![],
        meetings,
        meetings_error,
        meeting_id: meeting_id.to_string(),
        meeting_form_name: meeting_name,
    })
}

/// POST /meetingforms/create — validate the meeting id against the owner's
/// live meeting list, then create the form with active=true.
pub async fn create_submit(
    pool: web::Data<DbPool>,
    zoom: web::Data<ZoomClient>,
    session: Session,
    form: web::Form<CreateForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (user_id, creds) = owner_credentials(&pool, &session).await?;

    let name = form.meeting_form_name.trim().to_string();
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&name, "Form name", 200));

    let meeting_id = match validate::parse_meeting_id(&form.meeting_id) {
        Ok(id) => Some(id),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    // The meeting must actually exist under the owner's credentials.
    let mut meetings: Vec<MeetingSummary> = vec![];
    let mut meetings_error = None;
    if let Some(id) = meeting_id {
        match zoom.list_meetings(&creds).await {
            Ok(listed) => {
                if !listed.iter().any(|m| m.id == id) {
                    errors.push(format!("Meeting {id} is not one of your Zoom meetings"));
                }
                meetings = listed;
            }
            Err(e) => {
                errors.push(format!("Could not verify the meeting with Zoom: {e}"));
                meetings_error = Some(e.to_string());
            }
        }
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(CreateFormTemplate {
            ctx,
            errors,
            meetings,
            meetings_error,
            meeting_id: form.meeting_id.clone(),
            meeting_form_name: name,
        });
    }

    let meeting_id = meeting_id.ok_or_else(|| {
        AppError::Session("Meeting id missing after validation".to_string())
    })?;
    let form_id = meeting_form::create(&pool, user_id, meeting_id, &name).await?;
    log::info!("User {user_id} created form {form_id} for meeting {meeting_id}");

    flash(&session, &format!("Created new form for meeting {meeting_id}"));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/meetingforms/{form_id}")))
        .finish())
}

/// GET /meetingforms/{id} — owner view with registrants and the shareable
/// public link. Forbidden for non-owners, and for owners whose credentials
/// no longer see the underlying meeting.
pub async fn detail(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    zoom: web::Data<ZoomClient>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let (user_id, creds) = owner_credentials(&pool, &session).await?;

    let form = meeting_form::find_by_id(&pool, form_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner(&form, user_id)?;

    let listed = zoom.list_meetings(&creds).await?;
    if !listed.iter().any(|m| m.id == form.meeting_id) {
        return Err(AppError::Forbidden(format!(
            "Meeting {} is no longer accessible with the stored credentials",
            form.meeting_id
        )));
    }

    let registrants = registrant::find_by_form(&pool, form_id).await?;

    let conn_info = req.connection_info();
    let view_link = format!(
        "{}://{}/meetingforms/{}/view",
        conn_info.scheme(),
        conn_info.host(),
        form_id
    );

    let ctx = PageContext::build(&session);
    render(MeetingFormTemplate {
        ctx,
        form,
        registrants,
        view_link,
    })
}

/// POST /meetingforms/{id}/toggle — flip active/inactive. Owner only.
pub async fn toggle(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form_id = path.into_inner();
    let user_id =
        get_user_id(&session).ok_or_else(|| AppError::Session("Not logged in".to_string()))?;

    let existing = meeting_form::find_by_id(&pool, form_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner(&existing, user_id)?;

    let now_active = meeting_form::toggle_active(&pool, form_id)
        .await?
        .ok_or(AppError::NotFound)?;
    flash(
        &session,
        if now_active {
            "Form is now accepting registrations"
        } else {
            "Form is now closed to registrations"
        },
    );

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/meetingforms/{form_id}")))
        .finish())
}
