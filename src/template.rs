//! HTML email template loading and placeholder substitution.

use std::path::{Path, PathBuf};

pub const SUBJECT_PLACEHOLDER: &str = "{{subject}}";
pub const MESSAGE_PLACEHOLDER: &str = "{{message}}";

#[derive(Debug)]
pub struct TemplateLoadError {
  pub path: PathBuf,
  pub source: std::io::Error,
}

impl std::error::Error for TemplateLoadError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}

impl std::fmt::Display for TemplateLoadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Failed to load template {}: {}", self.path.display(), self.source)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
  pub subject: String,
  pub html: String,
}

/// Replaces the first `{{subject}}` and then the first `{{message}}` with the given values, verbatim.
///
/// Nothing is escaped. A subject that itself contains `{{message}}` will have that token
/// substituted by the message.
pub fn render(template: &str, subject: &str, message: &str) -> String {
  template
    .replacen(SUBJECT_PLACEHOLDER, subject, 1)
    .replacen(MESSAGE_PLACEHOLDER, message, 1)
}

pub async fn load_template(path: &Path) -> Result<String, TemplateLoadError> {
  tokio::fs::read_to_string(path).await.map_err(|source| TemplateLoadError {
    path: path.to_path_buf(),
    source,
  })
}

/// Reads the template from disk (never cached) and renders it.
pub async fn render_email(path: &Path, subject: &str, message: &str) -> Result<RenderedEmail, TemplateLoadError> {
  let template = load_template(path).await?;
  Ok(RenderedEmail {
    subject: subject.to_string(),
    html: render(&template, subject, message),
  })
}
