use std::any::Any;

use axum::{
  extract::DefaultBodyLimit,
  middleware::from_fn_with_state,
  response::{IntoResponse, Response},
  routing::get,
  Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
  config::AppConfig,
  domains::mail::rest::mail_routes,
  middleware::{cors::cors_layer, rate_limit::rate_limit, security_headers::with_security_headers},
  state::SharedAppState,
  utils::error::{AppError, INTERNAL_ERROR_MESSAGE},
};

pub const HEALTH_MESSAGE: &str = "Server is running.";
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Builds the router. Layers run outermost first: trace, panic catcher, CORS, security
/// headers, rate limiter, then the route (whose JSON extractor parses the body).
pub fn create_app(state: SharedAppState, config: &AppConfig) -> Router {
  let router = Router::new()
    .route("/", get(health_handler))
    .merge(mail_routes())
    .fallback(not_found_handler)
    .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
    .layer(from_fn_with_state(state.rate_limiter.clone(), rate_limit));

  with_security_headers(router)
    .layer(cors_layer(&config.cors))
    .layer(CatchPanicLayer::custom(handle_panic))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn health_handler() -> &'static str {
  HEALTH_MESSAGE
}

async fn not_found_handler() -> AppError {
  AppError::not_found("Not Found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  let detail = err
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| err.downcast_ref::<&str>().copied())
    .unwrap_or("unknown panic");
  tracing::error!("Request handler panicked: {}", detail);

  AppError::internal_server_error(INTERNAL_ERROR_MESSAGE).into_response()
}
