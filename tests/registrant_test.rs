//! Registrant tests — persistence, per-form listing, and the cross-form
//! duplicate check keyed on the external meeting id.

mod common;

use common::*;
use zoomforms::models::registrant::{self, NewRegistrant};

const MEETING_ID: i64 = 86253472890;

fn sample_registrant(email: &str) -> NewRegistrant {
    NewRegistrant {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: Some("12 Analytical St".to_string()),
        job_title: None,
    }
}

#[tokio::test]
async fn test_create_and_list_registrants() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;
    let form_id = create_test_form(&pool, user_id, MEETING_ID, "Sign-up").await;

    registrant::create(&pool, form_id, &sample_registrant("ada@example.com"))
        .await
        .expect("Failed to create registrant");
    registrant::create(&pool, form_id, &sample_registrant("grace@example.com"))
        .await
        .expect("Failed to create registrant");

    let listed = registrant::find_by_form(&pool, form_id).await.expect("Query failed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].email, "ada@example.com");
    assert_eq!(listed[0].first_name, "Ada");
    assert_eq!(listed[0].address.as_deref(), Some("12 Analytical St"));
    assert!(listed[0].job_title.is_none());

    let count = registrant::count_by_form(&pool, form_id).await.expect("Count failed");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_duplicate_detected_across_forms_sharing_meeting() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;

    // Two forms, same external meeting
    let form_a = create_test_form(&pool, user_id, MEETING_ID, "Form A").await;
    let form_b = create_test_form(&pool, user_id, MEETING_ID, "Form B").await;

    registrant::create(&pool, form_a, &sample_registrant("ada@example.com"))
        .await
        .expect("Failed to create registrant");

    // The same email now counts as signed up for the meeting through
    // either form; the submit handler refuses before writing.
    assert!(registrant::exists_for_meeting(&pool, MEETING_ID, "ada@example.com")
        .await
        .expect("Check failed"));

    let count_b = registrant::count_by_form(&pool, form_b).await.expect("Count failed");
    assert_eq!(count_b, 0);
}

#[tokio::test]
async fn test_same_email_different_meeting_is_not_a_duplicate() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;

    let form_a = create_test_form(&pool, user_id, MEETING_ID, "Form A").await;
    create_test_form(&pool, user_id, MEETING_ID + 1, "Form B").await;

    registrant::create(&pool, form_a, &sample_registrant("ada@example.com"))
        .await
        .expect("Failed to create registrant");

    assert!(!registrant::exists_for_meeting(&pool, MEETING_ID + 1, "ada@example.com")
        .await
        .expect("Check failed"));
}

#[tokio::test]
async fn test_registrant_count_joined_into_form_list() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;
    let form_id = create_test_form(&pool, user_id, MEETING_ID, "Counted").await;

    registrant::create(&pool, form_id, &sample_registrant("one@example.com"))
        .await
        .expect("Failed to create registrant");
    registrant::create(&pool, form_id, &sample_registrant("two@example.com"))
        .await
        .expect("Failed to create registrant");

    let forms = zoomforms::models::meeting_form::find_by_user(&pool, user_id)
        .await
        .expect("Query failed");
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].registrant_count, 2);
}
