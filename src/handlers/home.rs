use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::get_user_id;
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::meeting_form;
use crate::templates_structs::{HomeTemplate, PageContext};

/// GET / and /home — the logged-in user's meeting forms, or a landing page
/// for anonymous visitors.
pub async fn index(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let forms = match get_user_id(&session) {
        Some(user_id) => meeting_form::find_by_user(&pool, user_id).await?,
        None => vec![],
    };

    let ctx = PageContext::build(&session);
    render(HomeTemplate { ctx, forms })
}
