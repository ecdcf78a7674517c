pub mod context;
pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use tower_cookies::Cookies;

use self::context::AuthContext;
use self::mutation::MutationRoot;
use self::query::QueryRoot;
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the GraphQL schema. All state flows through the per-request
/// `AuthContext`, so the schema itself is stateless and built once.
pub fn build_schema() -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

/// GraphQL POST handler. Materializes the request's authentication context
/// and hands it to the executor as execution data.
pub async fn graphql_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(AuthContext::new(&state, cookies));
    state.schema.execute(request).await.into()
}

/// GraphiQL playground GET handler.
pub async fn graphql_playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
