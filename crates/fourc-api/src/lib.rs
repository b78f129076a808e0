//! fourc-api
//!
//! HTTP hosting for 4C Mortality Score sessions. The library builds the
//! router so integration tests can drive it without binding a socket.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Score table (read-only)
        .route("/variables", get(routes::variables::list_variables))
        .route("/variables/{key}", get(routes::variables::get_variable))
        .route("/categories", get(routes::variables::list_categories))
        .route("/mortality", get(routes::variables::mortality_curve))
        .route("/explanation", get(routes::variables::explanation))
        // Calculator sessions
        .route("/sessions", post(routes::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route(
            "/sessions/{id}/selections/{key}",
            put(routes::sessions::select_value),
        )
        .route("/sessions/{id}/units/{key}", put(routes::sessions::set_units))
        .route("/sessions/{id}/result", get(routes::sessions::get_result))
        .route("/sessions/{id}/summary", get(routes::sessions::get_summary))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
