use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;

use super::model::MailRequest;
use crate::{
  email::{MailTransport, OutgoingMail, TransportError},
  template::{render_email, TemplateLoadError},
};

#[derive(Debug)]
pub enum MailServiceError {
  Template(TemplateLoadError),
  Transport(TransportError),
}

impl std::error::Error for MailServiceError {}

impl std::fmt::Display for MailServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MailServiceError::Template(err) => write!(f, "Template Error: {}", err),
      MailServiceError::Transport(err) => write!(f, "Transport Error: {}", err),
    }
  }
}

impl From<TemplateLoadError> for MailServiceError {
  fn from(err: TemplateLoadError) -> Self {
    MailServiceError::Template(err)
  }
}

impl From<TransportError> for MailServiceError {
  fn from(err: TransportError) -> Self {
    MailServiceError::Transport(err)
  }
}

#[async_trait]
pub trait MailService: Send + Sync {
  async fn send_mail(&self, req: MailRequest) -> Result<(), MailServiceError>;
}

pub struct MailServiceImpl {
  transport: Arc<dyn MailTransport>,
  template_path: PathBuf,
  from: String,
  send_timeout: Duration,
}

impl MailServiceImpl {
  pub fn new(transport: Arc<dyn MailTransport>, template_path: PathBuf, from: String, send_timeout: Duration) -> Self {
    Self {
      transport,
      template_path,
      from,
      send_timeout,
    }
  }
}

#[async_trait]
impl MailService for MailServiceImpl {
  /// Renders the template and makes exactly one delivery attempt, bounded by the send timeout.
  async fn send_mail(&self, req: MailRequest) -> Result<(), MailServiceError> {
    let rendered = render_email(&self.template_path, &req.subject, &req.message).await?;
    let mail = OutgoingMail::new(self.from.clone(), req.to, rendered.subject, rendered.html);

    tokio::time::timeout(self.send_timeout, self.transport.send_mail(mail))
      .await
      .map_err(|_| TransportError::Timeout(self.send_timeout))??;

    tracing::info!("Email sent");
    Ok(())
  }
}
