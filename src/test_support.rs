use std::{path::Path, sync::Arc};

use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use serde::Serialize;
use tower::ServiceExt;

use crate::{
  app::create_app,
  config::{AppConfig, DEFAULT_TEMPLATE_PATH},
  email::MailTransport,
  state::SharedAppState,
};

pub fn test_config() -> AppConfig {
  let mut config = AppConfig::from_lookup(|_| None).expect("default config");
  config.smtp.from_email = "noreply@example.com".to_string();
  config.mail.template_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TEMPLATE_PATH);
  config
}

pub fn app_with_transport(transport: Arc<dyn MailTransport>) -> Router {
  let config = test_config();
  let state = SharedAppState::new(transport, &config);
  create_app(state, &config)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .expect("build request");
  send(app, request).await
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  post_raw(
    app,
    uri,
    "application/json",
    serde_json::to_vec(body).expect("serialize request body"),
  )
  .await
}

pub async fn post_raw(
  app: Router,
  uri: &str,
  content_type: &str,
  body: impl Into<Body>,
) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", content_type)
    .body(body.into())
    .expect("build request");
  send(app, request).await
}
