//! Meeting form tests — creation round-trip, ownership fields, and the
//! active/inactive toggle.

mod common;

use common::*;
use zoomforms::models::meeting_form;

const MEETING_ID: i64 = 86253472890;

#[tokio::test]
async fn test_create_form_round_trip() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;

    let form_id = create_test_form(&pool, user_id, MEETING_ID, "Weekly sync sign-up").await;

    let found = meeting_form::find_by_id(&pool, form_id)
        .await
        .expect("Query failed")
        .expect("Form not found");
    assert_eq!(found.meeting_id, MEETING_ID);
    assert_eq!(found.meeting_form_name, "Weekly sync sign-up");
    assert_eq!(found.user_id, user_id);
    // New forms start active
    assert!(found.active);
}

#[tokio::test]
async fn test_find_by_id_missing() {
    let pool = setup_test_pool().await;

    let found = meeting_form::find_by_id(&pool, 9999).await.expect("Query failed");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_toggle_flips_active() {
    let pool = setup_test_pool().await;
    let user_id = create_test_user(&pool, TEST_USERNAME, TEST_EMAIL).await;
    let form_id = create_test_form(&pool, user_id, MEETING_ID, "Toggle me").await;

    let now_active = meeting_form::toggle_active(&pool, form_id)
        .await
        .expect("Toggle failed")
        .expect("Form not found");
    assert!(!now_active);

    let found = meeting_form::find_by_id(&pool, form_id)
        .await
        .expect("Query failed")
        .expect("Form not found");
    assert!(!found.active);

    // Toggling again reopens it
    let reopened = meeting_form::toggle_active(&pool, form_id)
        .await
        .expect("Toggle failed")
        .expect("Form not found");
    assert!(reopened);
}

#[tokio::test]
async fn test_toggle_missing_form() {
    let pool = setup_test_pool().await;

    let result = meeting_form::toggle_active(&pool, 424242).await.expect("Toggle failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_by_user_lists_only_own_forms() {
    let pool = setup_test_pool().await;
    let alice = create_test_user(&pool, "alice", "alice@example.com").await;
    let bob = create_test_user(&pool, "bob", "bob@example.com").await;

    create_test_form(&pool, alice, MEETING_ID, "Alice form 1").await;
    create_test_form(&pool, alice, MEETING_ID + 1, "Alice form 2").await;
    create_test_form(&pool, bob, MEETING_ID + 2, "Bob form").await;

    let alices = meeting_form::find_by_user(&pool, alice).await.expect("Query failed");
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|f| f.registrant_count == 0));

    let bobs = meeting_form::find_by_user(&pool, bob).await.expect("Query failed");
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].meeting_form_name, "Bob form");
}
