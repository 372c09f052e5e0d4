use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Permissive by default; an explicit origin list narrows only the allowed origins.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
  let origins: Vec<HeaderValue> = config
    .allowed_origins
    .iter()
    .filter_map(|origin| match HeaderValue::from_str(origin) {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
        None
      }
    })
    .collect();

  if origins.is_empty() {
    CorsLayer::permissive()
  } else {
    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Router,
  };
  use tower::ServiceExt;

  fn app(config: &CorsConfig) -> Router {
    Router::new()
      .route("/send-mail", post(|| async { "ok" }))
      .layer(cors_layer(config))
  }

  fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
      .method(Method::OPTIONS)
      .uri("/send-mail")
      .header(header::ORIGIN, origin)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
      .body(Body::empty())
      .unwrap()
  }

  #[tokio::test]
  async fn default_allows_any_origin() {
    let response = app(&CorsConfig::default())
      .oneshot(preflight("https://anywhere.example"))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
  }

  #[tokio::test]
  async fn origin_list_is_enforced() {
    let config = CorsConfig {
      allowed_origins: vec!["https://app.example".to_string()],
    };

    let allowed = app(&config).oneshot(preflight("https://app.example")).await.unwrap();
    assert_eq!(
      allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "https://app.example"
    );

    let denied = app(&config).oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
  }
}
