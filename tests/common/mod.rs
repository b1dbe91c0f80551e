//! Shared test infrastructure for model layer tests.
//!
//! Provides an in-memory SQLite pool with the schema applied, plus fixture
//! helpers for users and meeting forms.

use sqlx::sqlite::SqlitePoolOptions;

use zoomforms::db::{DbPool, MIGRATIONS};
use zoomforms::models::meeting_form;
use zoomforms::models::user::{self, NewUser};

pub const TEST_USERNAME: &str = "testuser";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "s3cret-passw0rd";

/// In-memory SQLite with the schema applied. Every connection of an
/// in-memory database is a separate database, so the pool is capped at one.
pub async fn setup_test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Insert a user with placeholder credentials. Tests that exercise real
/// password verification hash their own.
pub async fn create_test_user(pool: &DbPool, username: &str, email: &str) -> i64 {
    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: "$argon2id$placeholder".to_string(),
        api_key: "test_api_key".to_string(),
        api_secret: "test_api_secret".to_string(),
    };
    user::create(pool, &new_user)
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_form(pool: &DbPool, user_id: i64, meeting_id: i64, name: &str) -> i64 {
    meeting_form::create(pool, user_id, meeting_id, name)
        .await
        .expect("Failed to create test form")
}
