use actix_session::Session;
use chrono::Utc;

/// Session lifetime without "remember me".
const SESSION_TTL_SECS: i64 = 12 * 60 * 60;
/// Session lifetime with "remember me" checked at login.
const REMEMBER_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Store the logged-in identity in the session. `remember` extends the
/// expiry from hours to weeks.
pub fn establish(session: &Session, user_id: i64, username: &str, remember: bool) {
    let ttl = if remember {
        REMEMBER_TTL_SECS
    } else {
        SESSION_TTL_SECS
    };
    let _ = session.insert("user_id", user_id);
    let _ = session.insert("username", username);
    let _ = session.insert("expires_at", Utc::now().timestamp() + ttl);
}

/// The logged-in user's id, or None when anonymous or expired.
pub fn get_user_id(session: &Session) -> Option<i64> {
    let expires_at = session.get::<i64>("expires_at").unwrap_or(None)?;
    if expires_at <= Utc::now().timestamp() {
        return None;
    }
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    // Identity and expiry travel together; an expired session has no name.
    get_user_id(session)?;
    session.get::<String>("username").unwrap_or(None)
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

pub fn flash(session: &Session, message: &str) {
    let _ = session.insert("flash", message);
}
