use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::domains::mail::service::MailServiceError;

pub const SEND_FAILED_MESSAGE: &str = "Failed to send email.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn too_many_requests(message: impl Into<String>) -> Self {
    Self::new(StatusCode::TOO_MANY_REQUESTS, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": self.message,
    }));

    (self.status_code, body).into_response()
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    AppError::new(rejection.status(), rejection.body_text())
  }
}

impl From<MailServiceError> for AppError {
  fn from(error: MailServiceError) -> Self {
    tracing::error!("Error sending email: {:?}", error);
    AppError::internal_server_error(SEND_FAILED_MESSAGE)
  }
}
