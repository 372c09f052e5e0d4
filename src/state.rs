use std::sync::Arc;

use crate::{
  config::AppConfig,
  domains::mail::{
    model::MailRequest,
    service::{MailService, MailServiceError, MailServiceImpl},
  },
  email::MailTransport,
  middleware::rate_limit::RateLimiter,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_mail(&self, req: MailRequest) -> impl std::future::Future<Output = Result<(), MailServiceError>> + Send;
}

/// Everything request handlers share. Built once at startup and cloned cheaply per request.
#[derive(Clone)]
pub struct SharedAppState {
  pub mail_service: Arc<dyn MailService>,
  pub rate_limiter: Arc<RateLimiter>,
}

impl SharedAppState {
  pub fn new(transport: Arc<dyn MailTransport>, config: &AppConfig) -> Self {
    let mail_service = Arc::new(MailServiceImpl::new(
      transport,
      config.mail.template_path.clone(),
      config.smtp.from_header(),
      config.mail.send_timeout,
    ));
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));

    Self {
      mail_service,
      rate_limiter,
    }
  }
}

impl AppState for SharedAppState {
  async fn send_mail(&self, req: MailRequest) -> Result<(), MailServiceError> {
    self.mail_service.send_mail(req).await
  }
}
