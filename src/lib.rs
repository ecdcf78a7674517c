pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod state;

pub mod models {
    pub mod session;
    pub mod transaction;
    pub mod user;
}

pub mod repositories {
    pub mod memory;
    pub mod session;
    pub mod transaction;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod transactions;
}

pub mod validation {
    pub mod auth;
}

use axum::{
    Router,
    routing::get,
};
use http::{Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use state::AppState;

/// Builds the application router: the single GraphQL endpoint (POST for
/// queries/mutations, GET for GraphiQL) behind credentialed CORS, cookie
/// management, and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .cors_origin
                .parse::<http::HeaderValue>()
                .expect("CORS_ORIGIN must be a valid origin"),
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route(
            "/graphql",
            get(graphql::graphql_playground).post(graphql::graphql_handler),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}
