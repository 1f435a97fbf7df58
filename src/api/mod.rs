//! HTTP surface over the shared ledger.
//!
//! | Route                   | Ledger operation |
//! |-------------------------|------------------|
//! | `POST /add_points`      | record           |
//! | `DELETE /delete_points` | spend            |
//! | `GET /balance`          | balances         |
//! | `GET /health`           | liveness only    |

use axum::error_handling::HandleErrorLayer;
use axum::extract::OriginalUri;
use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::store::SharedLedger;

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorDetail, ErrorResponse};

#[derive(Clone, Default)]
pub struct ApiState {
    pub ledger: SharedLedger,
    pub config: ApiConfig,
}

impl ApiState {
    pub fn new(ledger: SharedLedger) -> Self {
        Self::with_config(ledger, ApiConfig::default())
    }

    pub fn with_config(ledger: SharedLedger, config: ApiConfig) -> Self {
        Self { ledger, config }
    }
}

pub fn router(state: ApiState) -> Router {
    let request_timeout = state.config.request_timeout;
    let concurrency_limit = state.config.concurrency_limit;

    let router = Router::new()
        .route(
            "/add_points",
            post(routes::add_points).fallback(method_not_allowed),
        )
        .route(
            "/delete_points",
            delete(routes::delete_points).fallback(method_not_allowed),
        )
        .route("/balance", get(routes::balance).fallback(method_not_allowed))
        .route("/health", get(routes::health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    let router = match concurrency_limit {
        Some(limit) => router.layer(GlobalConcurrencyLimitLayer::new(limit)),
        None => router,
    };

    let router = match request_timeout {
        Some(timeout) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(timeout)),
        ),
        None => router,
    };

    router.with_state(state)
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::NotFound {
        message: format!("not found: {}", uri.0.path()),
    }
}

async fn method_not_allowed(method: Method, uri: OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{method} not allowed on {}", uri.0.path()),
    }
}

async fn handle_timeout_error(_err: tower::BoxError) -> ApiError {
    ApiError::ServiceUnavailable {
        message: "Request timed out".to_string(),
    }
}
