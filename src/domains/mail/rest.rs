use axum::{
  extract::{rejection::JsonRejection, Json, State},
  response::Json as JsonResponse,
  routing::{post, Router},
};

use super::model::{MailRequest, SendMailResponse};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn mail_routes() -> Router<SharedAppState> {
  Router::new().route("/send-mail", post(send_mail_handler))
}

pub async fn send_mail_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<MailRequest>, JsonRejection>,
) -> Result<JsonResponse<SendMailResponse>, AppError> {
  let Json(payload) = payload?;

  state
    .send_mail(payload)
    .await
    .map(|()| JsonResponse(SendMailResponse::ok()))
    .map_err(Into::into)
}
