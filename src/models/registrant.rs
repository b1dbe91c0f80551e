use sqlx::FromRow;

use crate::db::DbPool;

/// A submitted public registration. Rows are append-only.
#[derive(Debug, Clone, FromRow)]
pub struct Registrant {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub job_title: Option<String>,
    pub date_registered: String,
    pub meeting_form_id: i64,
}

pub struct NewRegistrant {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub job_title: Option<String>,
}

pub async fn create(
    pool: &DbPool,
    meeting_form_id: i64,
    new: &NewRegistrant,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO registrants (email, first_name, last_name, address, job_title, meeting_form_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&new.email)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.address)
    .bind(&new.job_title)
    .bind(meeting_form_id)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Registrants of one form, in sign-up order.
pub async fn find_by_form(
    pool: &DbPool,
    meeting_form_id: i64,
) -> Result<Vec<Registrant>, sqlx::Error> {
    sqlx::query_as::<_, Registrant>(
        "SELECT id, email, first_name, last_name, address, job_title, date_registered, \
                meeting_form_id \
         FROM registrants WHERE meeting_form_id = ?1 ORDER BY id",
    )
    .bind(meeting_form_id)
    .fetch_all(pool)
    .await
}

/// Duplicate check across every form that references the same external
/// meeting: one email may register for a given Zoom meeting only once,
/// no matter which form it came through. Pre-write check only; the races
/// it leaves open are accepted.
pub async fn exists_for_meeting(
    pool: &DbPool,
    meeting_id: i64,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM registrants r \
         JOIN meeting_forms f ON f.id = r.meeting_form_id \
         WHERE f.meeting_id = ?1 AND r.email = ?2",
    )
    .bind(meeting_id)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn count_by_form(pool: &DbPool, meeting_form_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM registrants WHERE meeting_form_id = ?1")
        .bind(meeting_form_id)
        .fetch_one(pool)
        .await
}
