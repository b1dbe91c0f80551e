use sqlx::FromRow;

use crate::db::DbPool;

/// Internal user struct for authentication — includes password hash and
/// Zoom API credentials.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub api_key: String,
    pub api_secret: String,
    pub created_at: String,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub api_key: String,
    pub api_secret: String,
}

const SELECT_USER: &str = "SELECT id, username, email, password, api_key, api_secret, created_at \
     FROM users";

pub async fn create(pool: &DbPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (username, email, password, api_key, api_secret) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password)
    .bind(&new.api_key)
    .bind(&new.api_secret)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find user by email for login.
pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(
    pool: &DbPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ?1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// True when another user (id != exclude_id) already holds this username.
/// Pass None to check against all users, as at registration.
pub async fn username_taken(
    pool: &DbPool,
    username: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE username = ?1 AND id != ?2",
    )
    .bind(username)
    .bind(exclude_id.unwrap_or(0))
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn email_taken(
    pool: &DbPool,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2")
            .bind(email)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Overwrite account fields in place. Password is untouched; username,
/// email and API credentials are replaced.
pub async fn update_account(
    pool: &DbPool,
    id: i64,
    username: &str,
    email: &str,
    api_key: &str,
    api_secret: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET username = ?1, email = ?2, api_key = ?3, api_secret = ?4 \
         WHERE id = ?5",
    )
    .bind(username)
    .bind(email)
    .bind(api_key)
    .bind(api_secret)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}
