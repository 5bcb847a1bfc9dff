//! Axum router construction for the Rally API.
//!
//! One HTTP endpoint accepts GraphQL query/mutation documents; a separate
//! path upgrades to the GraphQL WebSocket protocol for subscriptions. A
//! GraphiQL page is served for interactive exploration.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQL, GraphQLSubscription};
use axum::Router;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use rally_graphql::RallySchema;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Routes:
/// - `GET /` -- GraphiQL page
/// - `POST /` -- GraphQL query/mutation endpoint
/// - `GET /ws` -- GraphQL subscription `WebSocket`
///
/// CORS is configured to allow any origin for development. In production
/// this should be restricted.
pub fn build_router(schema: RallySchema) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(graphiql).post_service(GraphQL::new(schema.clone())))
        .route_service("/ws", GraphQLSubscription::new(schema))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the GraphiQL page pointed at the query and subscription
/// endpoints.
async fn graphiql() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/")
            .subscription_endpoint("/ws")
            .finish(),
    )
}
