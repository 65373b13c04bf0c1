//! GraphQL HTTP handlers
//!
//! `async_graphql::Request` and `Response` are plain serde types, so
//! the execute endpoint is an ordinary axum JSON handler over the
//! schema held in AppState.

use crate::state::AppState;
use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};

/// Execute a GraphQL request
///
/// POST /graphql
pub async fn graphql_handler(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(state.schema().execute(request).await)
}

/// Serve the GraphiQL IDE
///
/// GET /graphql
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
