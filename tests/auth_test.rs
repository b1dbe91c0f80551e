//! Authentication tests — covers password hashing, verification, and the
//! email-based login lookup.

mod common;

use common::*;
use zoomforms::auth::password;
use zoomforms::models::user::{self, NewUser};

#[test]
fn test_hash_produces_phc_string() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    // PHC format, ready for the users.password column
    assert!(hash.starts_with("$argon2"));
    assert!(hash.contains('$'));
}

#[test]
fn test_verify_accepts_only_the_right_password() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert!(password::verify_password(TEST_PASSWORD, &hash).expect("Verification failed"));
    assert!(
        !password::verify_password("someone-elses-guess", &hash).expect("Verification failed")
    );
}

#[test]
fn test_verify_rejects_malformed_hash() {
    // A corrupted stored hash is an error, not a silent mismatch
    assert!(password::verify_password(TEST_PASSWORD, "not-a-phc-hash").is_err());
}

#[test]
fn test_salts_differ_between_hashes() {
    let first = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let second = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert_ne!(first, second);
    assert!(password::verify_password(TEST_PASSWORD, &first).expect("Verification failed"));
    assert!(password::verify_password(TEST_PASSWORD, &second).expect("Verification failed"));
}

#[tokio::test]
async fn test_login_lookup_with_real_hash() {
    let pool = setup_test_pool().await;

    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let new_user = NewUser {
        username: TEST_USERNAME.to_string(),
        email: TEST_EMAIL.to_string(),
        password: hash,
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
    };
    user::create(&pool, &new_user).await.expect("Failed to create user");

    // Correct email + password verifies
    let found = user::find_by_email(&pool, TEST_EMAIL)
        .await
        .expect("Query failed")
        .expect("User not found");
    assert!(password::verify_password(TEST_PASSWORD, &found.password)
        .expect("Verification failed"));

    // Wrong password does not
    assert!(!password::verify_password("nottherightone", &found.password)
        .expect("Verification failed"));

    // Unknown email finds nothing
    let missing = user::find_by_email(&pool, "nobody@example.com")
        .await
        .expect("Query failed");
    assert!(missing.is_none());
}
