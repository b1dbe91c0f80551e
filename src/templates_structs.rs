use actix_session::Session;
use askama::Template;

use crate::auth::csrf;
use crate::auth::session::{get_username, take_flash};
use crate::models::meeting_form::{FormListItem, MeetingForm};
use crate::models::registrant::Registrant;
use crate::zoom::client::MeetingSummary;

/// Common context shared by all pages: who is logged in (if anyone), the
/// pending flash message, and the CSRF token for forms.
pub struct PageContext {
    pub username: Option<String>,
    pub flash: Option<String>,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        PageContext {
            username: get_username(session),
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub forms: Vec<FormListItem>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub username: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub username: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Template)]
#[template(path = "create_form.html")]
pub struct CreateFormTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    /// Live meetings from the owner's Zoom account, for pre-filling.
    pub meetings: Vec<MeetingSummary>,
    /// Set when the meeting list could not be fetched.
    pub meetings_error: Option<String>,
    pub meeting_id: String,
    pub meeting_form_name: String,
}

#[derive(Template)]
#[template(path = "meeting_form.html")]
pub struct MeetingFormTemplate {
    pub ctx: PageContext,
    pub form: MeetingForm,
    pub registrants: Vec<Registrant>,
    pub view_link: String,
}

#[derive(Template)]
#[template(path = "meeting_form_public.html")]
pub struct PublicFormTemplate {
    pub ctx: PageContext,
    pub form_id: i64,
    pub form_name: String,
    pub errors: Vec<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub address: String,
}

#[derive(Template)]
#[template(path = "register_complete.html")]
pub struct RegisterCompleteTemplate {
    pub meeting_form_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ctx() -> PageContext {
        PageContext {
            username: Some("alice".to_string()),
            flash: None,
            csrf_token: "testtoken".to_string(),
        }
    }

    #[test]
    fn prefill_link_percent_encodes_the_topic() {
        let tmpl = CreateFormTemplate {
            ctx: test_ctx(),
            errors: vec![],
            meetings: vec![MeetingSummary {
                id: 86253472890,
                topic: "Q3/Planning? Review".to_string(),
                start_time: None,
                duration: None,
                join_url: None,
            }],
            meetings_error: None,
            meeting_id: String::new(),
            meeting_form_name: String::new(),
        };

        let html = tmpl.render().expect("Failed to render");
        // The path segment must survive topics containing '/' and '?'
        assert!(html.contains("/meetingforms/create/86253472890/Q3%2FPlanning%3F%20Review"));
        assert!(!html.contains("/meetingforms/create/86253472890/Q3/Planning"));
    }
}
