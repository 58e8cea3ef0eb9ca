//! Integration tests for book queries and the addBook mutation.

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
    let response = app.execute(&query).await;
    data_json(&response)["register"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_book(app: &TestApp, token: &str, title: &str, author: &str, year: i32) -> String {
    let query = format!(
        r#"mutation {{
            addBook(title: "{title}", author: "{author}", publishedYear: {year}) {{ id }}
        }}"#
    );
    let response = app.execute_as(token, &query).await;
    data_json(&response)["addBook"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// addBook
// =============================================================================

#[tokio::test]
async fn test_add_book_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .execute(
            r#"mutation {
                addBook(title: "Dune", author: "Frank Herbert", publishedYear: 1965) { id }
            }"#,
        )
        .await;

    let (_, code) = first_error(&response);
    assert_eq!(code, "403");
}

#[tokio::test]
async fn test_add_book_validates_arguments_before_auth() {
    let app = TestApp::new();

    // Anonymous AND missing title: the validation error wins.
    let response = app
        .execute(
            r#"mutation {
                addBook(title: "", author: "Frank Herbert", publishedYear: 1965) { id }
            }"#,
        )
        .await;
    let (message, code) = first_error(&response);
    assert_eq!(code, "404");
    assert!(message.contains("title"), "got: {message}");

    // A zero year counts as missing.
    let token = register(&app, "alice").await;
    let response = app
        .execute_as(
            &token,
            r#"mutation {
                addBook(title: "Dune", author: "Frank Herbert", publishedYear: 0) { id }
            }"#,
        )
        .await;
    let (_, code) = first_error(&response);
    assert_eq!(code, "404");
}

#[tokio::test]
async fn test_add_book_creates_the_book() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;

    let response = app
        .execute_as(
            &token,
            r#"mutation {
                addBook(title: "Dune", author: "Frank Herbert", publishedYear: 1965) {
                    id title author publishedYear
                }
            }"#,
        )
        .await;

    let data = data_json(&response);
    assert_eq!(data["addBook"]["id"], "1");
    assert_eq!(data["addBook"]["title"], "Dune");
    assert_eq!(data["addBook"]["author"], "Frank Herbert");
    assert_eq!(data["addBook"]["publishedYear"], 1965);
}

// =============================================================================
// getBooks / getBook
// =============================================================================

#[tokio::test]
async fn test_get_books_on_an_empty_catalogue() {
    let app = TestApp::new();

    let response = app.execute("query { getBooks { id } }").await;
    let data = data_json(&response);
    assert_eq!(data["getBooks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_books_paginates_in_insertion_order() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    for i in 1..=5 {
        add_book(&app, &token, &format!("Book {i}"), "Author", 2000 + i).await;
    }

    let response = app
        .execute("query { getBooks(skip: 1, take: 2) { title } }")
        .await;
    let data = data_json(&response);
    let titles: Vec<&str> = data["getBooks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Book 2", "Book 3"]);
}

#[tokio::test]
async fn test_get_book_returns_null_for_unknown_id() {
    let app = TestApp::new();

    let response = app.execute(r#"query { getBook(id: "99") { id } }"#).await;
    let data = data_json(&response);
    assert!(data["getBook"].is_null());
}

#[tokio::test]
async fn test_get_book_rejects_an_empty_id() {
    let app = TestApp::new();

    let response = app.execute(r#"query { getBook(id: "") { id } }"#).await;
    let (message, code) = first_error(&response);
    assert_eq!(code, "404");
    assert!(message.contains("book id"), "got: {message}");
}

#[tokio::test]
async fn test_get_book_returns_the_book_with_reviews() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    let book_id = add_book(&app, &token, "Dune", "Frank Herbert", 1965).await;

    let add_review = format!(
        r#"mutation {{
            addReview(bookId: "{book_id}", rating: 5, comment: "A classic") {{ id }}
        }}"#
    );
    data_json(&app.execute_as(&token, &add_review).await);

    let query = format!(r#"query {{ getBook(id: "{book_id}") {{ title reviews {{ rating comment }} }} }}"#);
    let data = data_json(&app.execute(&query).await);
    assert_eq!(data["getBook"]["title"], "Dune");
    assert_eq!(data["getBook"]["reviews"][0]["rating"], 5);
    assert_eq!(data["getBook"]["reviews"][0]["comment"], "A classic");
}

// =============================================================================
// searchBooks
// =============================================================================

#[tokio::test]
async fn test_search_books_matches_title_and_author_case_insensitively() {
    let app = TestApp::new();
    let token = register(&app, "alice").await;
    add_book(&app, &token, "Dune", "Frank Herbert", 1965).await;
    add_book(&app, &token, "Hyperion", "Dan Simmons", 1989).await;
    add_book(&app, &token, "Foundation", "Isaac Asimov", 1951).await;

    // Title match, different case.
    let data = data_json(
        &app.execute(r#"query { searchBooks(query: "dune") { title } }"#)
            .await,
    );
    assert_eq!(data["searchBooks"][0]["title"], "Dune");
    assert_eq!(data["searchBooks"].as_array().unwrap().len(), 1);

    // Author substring match.
    let data = data_json(
        &app.execute(r#"query { searchBooks(query: "simmons") { title } }"#)
            .await,
    );
    assert_eq!(data["searchBooks"][0]["title"], "Hyperion");

    // No match.
    let data = data_json(
        &app.execute(r#"query { searchBooks(query: "zelazny") { title } }"#)
            .await,
    );
    assert_eq!(data["searchBooks"].as_array().unwrap().len(), 0);
}
