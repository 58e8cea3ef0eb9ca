//! Integration tests for Paperback.
//!
//! Tests execute GraphQL operations against the full schema backed by the
//! in-memory store, so the whole resolver stack runs without a database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p paperback-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use async_graphql::{Request, Response};
use secrecy::SecretString;
use serde_json::Value;

use paperback_api::db::Store;
use paperback_api::db::memory::MemStore;
use paperback_api::graphql::{ApiSchema, build_schema};
use paperback_api::middleware::Identity;
use paperback_api::services::auth::{AuthService, PasswordCost, TokenSigner};

/// Signing secret for tests. High entropy so it would also pass config
/// validation.
const TEST_SECRET: &str = "wJ4nJ9pXq2vL8mK3rT6yU1sD5fG0hB7c";

/// A fully wired schema over an in-memory store.
pub struct TestApp {
    schema: ApiSchema,
    signer: TokenSigner,
    store: Arc<MemStore>,
}

impl TestApp {
    /// Create a fresh app with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        let signer = TokenSigner::new(&SecretString::from(TEST_SECRET), 48);
        let auth = AuthService::new(
            Arc::clone(&store) as Arc<dyn Store>,
            signer.clone(),
            PasswordCost::fast(),
        );
        let schema = build_schema(Arc::clone(&store) as Arc<dyn Store>, auth);

        Self {
            schema,
            signer,
            store,
        }
    }

    /// Execute a query or mutation without authentication.
    pub async fn execute(&self, query: &str) -> Response {
        self.execute_request(Request::new(query), None).await
    }

    /// Execute a query or mutation with a bearer token.
    pub async fn execute_as(&self, token: &str, query: &str) -> Response {
        self.execute_request(Request::new(query), Some(token)).await
    }

    async fn execute_request(&self, request: Request, token: Option<&str>) -> Response {
        let identity = Identity::from_header(token, &self.signer);
        self.schema.execute(request.data(identity)).await
    }

    /// The token signer, for asserting on issued tokens.
    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// The backing store, for asserting on row counts.
    #[must_use]
    pub fn store(&self) -> &MemStore {
        &self.store
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The response data as JSON. Panics if the response carries errors.
///
/// # Panics
///
/// Panics when the response has errors or the data does not serialize.
#[must_use]
pub fn data_json(response: &Response) -> Value {
    assert!(
        response.errors.is_empty(),
        "expected success, got errors: {:?}",
        response.errors
    );
    serde_json::to_value(&response.data).expect("response data serializes")
}

/// The first error's message and `code` extension.
///
/// # Panics
///
/// Panics when the response has no errors.
#[must_use]
pub fn first_error(response: &Response) -> (String, String) {
    let err = response
        .errors
        .first()
        .expect("expected at least one error");
    let serialized = serde_json::to_value(err).expect("server error serializes");
    let code = serialized["extensions"]["code"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    (err.message.clone(), code)
}
