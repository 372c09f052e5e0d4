use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /send-mail`.
///
/// Fields are taken as whatever JSON they hold: missing or `null` becomes an empty string,
/// other non-string values become their JSON text (`123`, `true`, `["a"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailRequest {
  #[serde(default, deserialize_with = "as_text")]
  pub to: String,
  #[serde(default, deserialize_with = "as_text")]
  pub subject: String,
  #[serde(default, deserialize_with = "as_text")]
  pub message: String,
}

fn as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(text)) => text,
    Some(other) => other.to_string(),
  })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMailResponse {
  pub success: bool,
}

impl SendMailResponse {
  pub fn ok() -> Self {
    Self { success: true }
  }
}
