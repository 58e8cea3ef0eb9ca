//! Integration tests for review mutations, ownership gating, and
//! getMyReviews.

use paperback_api::db::Store;
use paperback_integration_tests::{TestApp, data_json, first_error};

// =============================================================================
// Helpers
// =============================================================================

async fn register(app: &TestApp, username: &str) -> String {
    let query = format!(
        r#"mutation {{
            register(username: "{username}", email: "{username}@x.com", password: "pw") {{
                token
            }}
        }}"#
    );
    data_json(&app.execute(&query).await)["register"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_book(app: &TestApp, token: &str) -> String {
    let response = app
        .execute_as(
            token,
            r#"mutation {
                addBook(title: "Dune", author: "Frank Herbert", publishedYear: 1965) { id }
            }"#,
        )
        .await;
    data_json(&response)["addBook"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_review(app: &TestApp, token: &str, book_id: &str, rating: i32, comment: &str) -> String {
    let query = format!(
        r#"mutation {{
            addReview(bookId: "{book_id}", rating: {rating}, comment: "{comment}") {{ id }}
        }}"#
    );
    data_json(&app.execute_as(token, &query).await)["addReview"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// addReview
// =============================================================================

#[tokio::test]
async fn test_add_review_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .execute(r#"mutation { addReview(bookId: "1", rating: 5, comment: "Great") { id } }"#)
        .await;

    let (_, code) = first_error(&response);
    assert_eq!(code, "403");
}

#[tokio::test]
async fn test_add_review_validates_arguments_before_auth() {
    let app = TestApp::new();

    // Anonymous AND zero rating: the validation error wins.
    let response = app
        .execute(r#"mutation { addReview(bookId: "1", rating: 0, comment: "Great") { id } }"#)
        .await;
    let (message, code) = first_error(&response);
    assert_eq!(code, "404");
    assert!(message.contains("rating"), "got: {message}");

    let response = app
        .execute(r#"mutation { addReview(bookId: "1", rating: 5, comment: "") { id } }"#)
        .await;
    let (_, code) = first_error(&response);
    assert_eq!(code, "404");

    let response = app
        .execute(r#"mutation { addReview(bookId: "", rating: 5, comment: "Great") { id } }"#)
        .await;
    let (_, code) = first_error(&response);
    assert_eq!(code, "404");
}

#[tokio::test]
async fn test_add_review_creates_a_review_owned_by_the_caller() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;

    let query = format!(
        r#"mutation {{
            addReview(bookId: "{book_id}", rating: 4, comment: "Solid") {{
                id rating comment
                user {{ username }}
                book {{ title }}
            }}
        }}"#
    );
    let data = data_json(&app.execute_as(&token, &query).await);

    assert_eq!(data["addReview"]["rating"], 4);
    assert_eq!(data["addReview"]["comment"], "Solid");
    assert_eq!(data["addReview"]["user"]["username"], "alice");
    assert_eq!(data["addReview"]["book"]["title"], "Dune");
}

// =============================================================================
// updateReview
// =============================================================================

#[tokio::test]
async fn test_update_review_by_a_non_owner_fails() {
    let app = TestApp::new();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let book_id = add_book(&app, &alice).await;
    let review_id = add_review(&app, &alice, &book_id, 5, "Loved it").await;

    let query = format!(
        r#"mutation {{ updateReview(reviewId: "{review_id}", rating: 1) {{ id }} }}"#
    );
    let (_, code) = first_error(&app.execute_as(&bob, &query).await);
    assert_eq!(code, "403");

    // The review is untouched.
    let check = format!(r#"query {{ getReviews(bookId: "{book_id}") {{ rating }} }}"#);
    let data = data_json(&app.execute(&check).await);
    assert_eq!(data["getReviews"][0]["rating"], 5);
}

#[tokio::test]
async fn test_update_of_a_nonexistent_review_fails_like_not_owner() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;

    let response = app
        .execute_as(
            &token,
            r#"mutation { updateReview(reviewId: "99", rating: 1) { id } }"#,
        )
        .await;

    let (_, code) = first_error(&response);
    assert_eq!(code, "403");
}

#[tokio::test]
async fn test_update_review_overwrites_only_the_supplied_fields() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;
    let review_id = add_review(&app, &token, &book_id, 5, "Loved it").await;

    // Only the rating.
    let query = format!(
        r#"mutation {{ updateReview(reviewId: "{review_id}", rating: 2) {{ rating comment }} }}"#
    );
    let data = data_json(&app.execute_as(&token, &query).await);
    assert_eq!(data["updateReview"]["rating"], 2);
    assert_eq!(data["updateReview"]["comment"], "Loved it");

    // Only the comment.
    let query = format!(
        r#"mutation {{
            updateReview(reviewId: "{review_id}", comment: "On reflection") {{ rating comment }}
        }}"#
    );
    let data = data_json(&app.execute_as(&token, &query).await);
    assert_eq!(data["updateReview"]["rating"], 2);
    assert_eq!(data["updateReview"]["comment"], "On reflection");
}

#[tokio::test]
async fn test_update_review_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .execute(r#"mutation { updateReview(reviewId: "1", rating: 1) { id } }"#)
        .await;
    let (_, code) = first_error(&response);
    assert_eq!(code, "403");
}

// =============================================================================
// deleteReview
// =============================================================================

#[tokio::test]
async fn test_delete_review_returns_the_prior_state() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;
    let review_id = add_review(&app, &token, &book_id, 5, "Loved it").await;

    let query = format!(
        r#"mutation {{ deleteReview(reviewId: "{review_id}") {{ id rating comment }} }}"#
    );
    let data = data_json(&app.execute_as(&token, &query).await);
    assert_eq!(data["deleteReview"]["id"], review_id);
    assert_eq!(data["deleteReview"]["rating"], 5);
    assert_eq!(data["deleteReview"]["comment"], "Loved it");

    assert_eq!(app.store().review_count(), 0);
}

#[tokio::test]
async fn test_delete_of_a_nonexistent_review_reports_not_found() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;

    let response = app
        .execute_as(&token, r#"mutation { deleteReview(reviewId: "99") { id } }"#)
        .await;

    let (message, code) = first_error(&response);
    assert_eq!(code, "404");
    assert!(message.contains("not found"), "got: {message}");
}

#[tokio::test]
async fn test_delete_review_by_a_non_owner_fails_and_keeps_the_row() {
    let app = TestApp::new();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let book_id = add_book(&app, &alice).await;
    let review_id = add_review(&app, &alice, &book_id, 5, "Loved it").await;

    let query = format!(r#"mutation {{ deleteReview(reviewId: "{review_id}") {{ id }} }}"#);
    let (_, code) = first_error(&app.execute_as(&bob, &query).await);
    assert_eq!(code, "403");

    assert_eq!(app.store().review_count(), 1);
}

// =============================================================================
// getMyReviews
// =============================================================================

#[tokio::test]
async fn test_get_my_reviews_requires_authentication() {
    let app = TestApp::new();

    let response = app.execute("query { getMyReviews { id } }").await;
    let (_, code) = first_error(&response);
    assert_eq!(code, "403");
}

#[tokio::test]
async fn test_get_my_reviews_returns_only_the_callers_reviews() {
    let app = TestApp::new();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let book_id = add_book(&app, &alice).await;
    add_review(&app, &alice, &book_id, 5, "Alice was here").await;
    add_review(&app, &bob, &book_id, 2, "Bob disagrees").await;
    add_review(&app, &alice, &book_id, 4, "Alice again").await;

    let data = data_json(&app.execute_as(&alice, "query { getMyReviews { comment } }").await);
    let comments: Vec<&str> = data["getMyReviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["comment"].as_str().unwrap())
        .collect();
    assert_eq!(comments, vec!["Alice was here", "Alice again"]);
}

#[tokio::test]
async fn test_get_reviews_paginates_for_a_book() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;
    for i in 1..=4 {
        add_review(&app, &token, &book_id, i, &format!("Pass {i}")).await;
    }

    let query = format!(
        r#"query {{ getReviews(bookId: "{book_id}", skip: 1, take: 2) {{ comment }} }}"#
    );
    let data = data_json(&app.execute(&query).await);
    let comments: Vec<&str> = data["getReviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["comment"].as_str().unwrap())
        .collect();
    assert_eq!(comments, vec!["Pass 2", "Pass 3"]);
}

// =============================================================================
// Associations
// =============================================================================

#[tokio::test]
async fn test_user_reviews_association_resolves() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;
    add_review(&app, &token, &book_id, 5, "Loved it").await;

    let data = data_json(
        &app.execute_as(
            &token,
            "query { getMyReviews { user { username reviews { comment } } } }",
        )
        .await,
    );
    assert_eq!(data["getMyReviews"][0]["user"]["username"], "alice");
    assert_eq!(
        data["getMyReviews"][0]["user"]["reviews"][0]["comment"],
        "Loved it"
    );
}

#[tokio::test]
async fn test_stale_token_for_a_missing_user_is_rejected() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token).await;
    app.store().reset().await.unwrap();

    let query = format!(
        r#"mutation {{ addReview(bookId: "{book_id}", rating: 5, comment: "Ghost") {{ id }} }}"#
    );
    let (_, code) = first_error(&app.execute_as(&token, &query).await);
    assert_eq!(code, "403");
}
