pub mod health;

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::AppError;
use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/check-api-key", get(handlers::handle_check_api_key))
        .route("/api/interview", post(handlers::handle_interview))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Renders a handler panic as the generic 500; the payload is only logged.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("Handler panicked: {detail}")).into_response()
}
