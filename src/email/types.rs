pub const DEFAULT_FROM_NAME: &str = "Mail Relay";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  /// Implicit TLS from the first byte. When false the connection upgrades with STARTTLS if offered.
  pub secure: bool,
  pub username: String,
  pub password: String,
  pub from_email: String,
  pub from_name: String,
}

impl SmtpConfig {
  pub fn default_port(secure: bool) -> u16 {
    if secure {
      465
    } else {
      587
    }
  }

  /// `From` header value, e.g. `Mail Relay <noreply@example.com>`.
  pub fn from_header(&self) -> String {
    format!("{} <{}>", self.from_name, self.from_email)
  }

  pub fn has_credentials(&self) -> bool {
    !self.username.is_empty()
  }
}

impl Default for SmtpConfig {
  fn default() -> Self {
    SmtpConfig {
      host: "localhost".to_string(),
      port: 587,
      secure: false,
      username: "".to_string(),
      password: "".to_string(),
      from_email: "".to_string(),
      from_name: DEFAULT_FROM_NAME.to_string(),
    }
  }
}

/// One fully rendered message as handed to a [`MailTransport`](super::MailTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub from: String,
  pub to: String,
  pub subject: String,
  pub html: String,
}

impl OutgoingMail {
  pub fn new(from: String, to: String, subject: String, html: String) -> Self {
    OutgoingMail { from, to, subject, html }
  }
}
