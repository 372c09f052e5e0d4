use std::time::Duration;

use async_trait::async_trait;
use lettre::{
  address::AddressError,
  message::{header::ContentType, Mailbox, Mailboxes},
  transport::smtp::{
    authentication::Credentials,
    client::{Tls, TlsParameters},
  },
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
  config::ConfigError,
  email::types::{OutgoingMail, SmtpConfig},
};

#[derive(Debug)]
pub enum TransportError {
  InvalidAddress(String),
  Message(String),
  Smtp(String),
  Timeout(Duration),
}

impl std::error::Error for TransportError {}

impl std::fmt::Display for TransportError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TransportError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
      TransportError::Message(msg) => write!(f, "Message build error: {}", msg),
      TransportError::Smtp(msg) => write!(f, "SMTP error: {}", msg),
      TransportError::Timeout(after) => write!(f, "Send timed out after {}s", after.as_secs()),
    }
  }
}

impl From<AddressError> for TransportError {
  fn from(err: AddressError) -> Self {
    TransportError::InvalidAddress(err.to_string())
  }
}

impl From<lettre::error::Error> for TransportError {
  fn from(err: lettre::error::Error) -> Self {
    TransportError::Message(err.to_string())
  }
}

impl From<lettre::transport::smtp::Error> for TransportError {
  fn from(err: lettre::transport::smtp::Error) -> Self {
    TransportError::Smtp(err.to_string())
  }
}

/// Anything able to deliver an [`OutgoingMail`]. Implementations are shared across
/// request tasks and must tolerate concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
  async fn send_mail(&self, mail: OutgoingMail) -> Result<(), TransportError>;
}

/// SMTP delivery through a pooled lettre transport.
///
/// Building it never talks to the server; connection problems show up on the first send.
pub struct EmailService {
  smtp_config: SmtpConfig,
  command_timeout: Duration,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
  /// `command_timeout` bounds each SMTP command, including the initial connect.
  pub fn new(smtp_config: SmtpConfig, command_timeout: Duration) -> Result<Self, ConfigError> {
    let builder = if smtp_config.secure {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.host)
        .map_err(|e| ConfigError::Transport(e.to_string()))?
    } else {
      let tls = TlsParameters::new(smtp_config.host.clone()).map_err(|e| ConfigError::Transport(e.to_string()))?;
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host).tls(Tls::Opportunistic(tls))
    };

    let builder = builder.port(smtp_config.port).timeout(Some(command_timeout));
    let transporter = if smtp_config.has_credentials() {
      let creds = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());
      builder.credentials(creds).build()
    } else {
      builder.build()
    };

    Ok(EmailService {
      smtp_config,
      command_timeout,
      transporter,
    })
  }

  pub fn smtp_config(&self) -> &SmtpConfig {
    &self.smtp_config
  }

  pub fn command_timeout(&self) -> Duration {
    self.command_timeout
  }

  pub fn build_message(mail: &OutgoingMail) -> Result<Message, TransportError> {
    let mut builder = Message::builder().from(mail.from.parse::<Mailbox>()?);
    for recipient in mail.to.parse::<Mailboxes>()? {
      builder = builder.to(recipient);
    }

    let message = builder
      .subject(mail.subject.as_str())
      .header(ContentType::TEXT_HTML)
      .body(mail.html.clone())?;

    Ok(message)
  }
}

#[async_trait]
impl MailTransport for EmailService {
  async fn send_mail(&self, mail: OutgoingMail) -> Result<(), TransportError> {
    let message = Self::build_message(&mail)?;
    let response = self.transporter.send(message).await?;
    tracing::debug!("SMTP server accepted message: {:?}", response.code());
    Ok(())
  }
}
