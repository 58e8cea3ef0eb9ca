//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /graphql  - GraphiQL IDE
//! POST /graphql  - GraphQL endpoint
//! ```
//!
//! Health probes (`/health`, `/health/ready`) are mounted by the binary.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::middleware::OptionalIdentity;
use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(CorsLayer::permissive())
}

/// Execute a GraphQL request with the caller's identity attached.
async fn graphql_handler(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let req = req.into_inner().data(identity);
    state.schema().execute(req).await.into()
}

/// Serve the GraphiQL IDE.
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
