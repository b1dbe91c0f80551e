use sqlx::FromRow;

use crate::db::DbPool;

/// A registration form tied to one external Zoom meeting. `meeting_id` and
/// `meeting_form_name` are immutable after creation; only `active` changes.
#[derive(Debug, Clone, FromRow)]
pub struct MeetingForm {
    pub id: i64,
    pub meeting_id: i64,
    pub meeting_form_name: String,
    pub date_created: String,
    pub active: bool,
    pub user_id: i64,
}

/// Row for the owner's home page list, with the registrant count joined in.
#[derive(Debug, Clone, FromRow)]
pub struct FormListItem {
    pub id: i64,
    pub meeting_id: i64,
    pub meeting_form_name: String,
    pub date_created: String,
    pub active: bool,
    pub registrant_count: i64,
}

pub async fn create(
    pool: &DbPool,
    user_id: i64,
    meeting_id: i64,
    meeting_form_name: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO meeting_forms (meeting_id, meeting_form_name, active, user_id) \
         VALUES (?1, ?2, 1, ?3)",
    )
    .bind(meeting_id)
    .bind(meeting_form_name)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<MeetingForm>, sqlx::Error> {
    sqlx::query_as::<_, MeetingForm>(
        "SELECT id, meeting_id, meeting_form_name, date_created, active, user_id \
         FROM meeting_forms WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// All forms created by one user, newest first.
pub async fn find_by_user(pool: &DbPool, user_id: i64) -> Result<Vec<FormListItem>, sqlx::Error> {
    sqlx::query_as::<_, FormListItem>(
        "SELECT f.id, f.meeting_id, f.meeting_form_name, f.date_created, f.active, \
                COUNT(r.id) AS registrant_count \
         FROM meeting_forms f \
         LEFT JOIN registrants r ON r.meeting_form_id = f.id \
         WHERE f.user_id = ?1 \
         GROUP BY f.id \
         ORDER BY f.date_created DESC, f.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Flip the active flag. Returns the new state, or None if the form does
/// not exist.
pub async fn toggle_active(pool: &DbPool, id: i64) -> Result<Option<bool>, sqlx::Error> {
    let result = sqlx::query("UPDATE meeting_forms SET active = NOT active WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    let active: bool = sqlx::query_scalar("SELECT active FROM meeting_forms WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(Some(active))
}
