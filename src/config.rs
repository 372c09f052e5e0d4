use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use crate::email::{SmtpConfig, DEFAULT_FROM_NAME};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/email-template.html";
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;

#[derive(Debug)]
pub enum ConfigError {
  InvalidValue { key: &'static str, value: String },
  Transport(String),
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ConfigError::InvalidValue { key, value } => write!(f, "Invalid value for {}: {:?}", key, value),
      ConfigError::Transport(msg) => write!(f, "Invalid SMTP transport settings: {}", msg),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl ServerConfig {
  /// `host:port`, resolved at bind time so hostnames like `localhost` work.
  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
  pub template_path: PathBuf,
  pub send_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
  pub window: Duration,
  pub max_requests: u32,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    RateLimitConfig {
      window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
      max_requests: DEFAULT_RATE_LIMIT_MAX,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
  /// Empty means any origin.
  pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server: ServerConfig,
  pub smtp: SmtpConfig,
  pub mail: MailConfig,
  pub rate_limit: RateLimitConfig,
  pub cors: CorsConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Builds the configuration from any key lookup. Unset or blank keys fall back to defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let secure = get("SMTP_SECURE").as_deref() == Some("true");
    let smtp = SmtpConfig {
      host: get("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
      port: parse_or("SMTP_PORT", get("SMTP_PORT"), SmtpConfig::default_port(secure))?,
      secure,
      username: get("SMTP_USER").unwrap_or_default(),
      password: lookup("SMTP_PASS").unwrap_or_default(),
      from_email: get("SMTP_FROM").unwrap_or_default(),
      from_name: get("SMTP_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
    };

    let server = ServerConfig {
      host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
      port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
    };

    let mail = MailConfig {
      template_path: resolve_template_path(
        get("TEMPLATE_PATH")
          .map(PathBuf::from)
          .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
        install_dir().as_deref(),
      ),
      send_timeout: Duration::from_secs(parse_or(
        "MAIL_SEND_TIMEOUT_SECS",
        get("MAIL_SEND_TIMEOUT_SECS"),
        DEFAULT_SEND_TIMEOUT_SECS,
      )?),
    };

    let rate_limit = RateLimitConfig {
      window: Duration::from_secs(parse_or(
        "RATE_LIMIT_WINDOW_SECS",
        get("RATE_LIMIT_WINDOW_SECS"),
        DEFAULT_RATE_LIMIT_WINDOW_SECS,
      )?),
      max_requests: parse_or("RATE_LIMIT_MAX", get("RATE_LIMIT_MAX"), DEFAULT_RATE_LIMIT_MAX)?,
    };

    let cors = CorsConfig {
      allowed_origins: get("CORS_ALLOWED_ORIGINS")
        .map(|origins| {
          origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty() && *o != "*")
            .map(str::to_string)
            .collect()
        })
        .unwrap_or_default(),
    };

    Ok(AppConfig {
      server,
      smtp,
      mail,
      rate_limit,
      cors,
    })
  }
}

/// Directory holding the running binary.
fn install_dir() -> Option<PathBuf> {
  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// A relative template path is looked up next to the binary first, then in the working directory.
pub fn resolve_template_path(path: PathBuf, install_dir: Option<&Path>) -> PathBuf {
  if path.is_absolute() {
    return path;
  }

  match install_dir.map(|dir| dir.join(&path)) {
    Some(installed) if installed.is_file() => installed,
    _ => path,
  }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
  match value {
    Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { key, value }),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn defaults_apply_when_nothing_is_set() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.smtp.host, "localhost");
    assert_eq!(config.smtp.port, 587);
    assert!(!config.smtp.secure);
    assert_eq!(config.smtp.from_name, DEFAULT_FROM_NAME);
    assert_eq!(config.mail.template_path, PathBuf::from(DEFAULT_TEMPLATE_PATH));
    assert_eq!(config.mail.send_timeout, Duration::from_secs(30));
    assert_eq!(config.rate_limit.window, Duration::from_secs(900));
    assert_eq!(config.rate_limit.max_requests, 100);
    assert!(config.cors.allowed_origins.is_empty());
  }

  #[test]
  fn reads_smtp_settings() {
    let config = config_from(&[
      ("SMTP_HOST", "smtp.example.com"),
      ("SMTP_PORT", "2525"),
      ("SMTP_SECURE", "true"),
      ("SMTP_USER", "relay"),
      ("SMTP_PASS", "secret"),
      ("SMTP_FROM", "noreply@example.com"),
    ])
    .unwrap();

    assert_eq!(config.smtp.host, "smtp.example.com");
    assert_eq!(config.smtp.port, 2525);
    assert!(config.smtp.secure);
    assert_eq!(config.smtp.username, "relay");
    assert_eq!(config.smtp.password, "secret");
    assert_eq!(config.smtp.from_email, "noreply@example.com");
  }

  #[test]
  fn secure_only_accepts_literal_true() {
    let config = config_from(&[("SMTP_SECURE", "yes")]).unwrap();
    assert!(!config.smtp.secure);

    let config = config_from(&[("SMTP_SECURE", "true")]).unwrap();
    assert!(config.smtp.secure);
    assert_eq!(config.smtp.port, 465);
  }

  #[test]
  fn invalid_port_is_rejected() {
    let result = config_from(&[("SMTP_PORT", "smtp")]);
    assert!(matches!(
      result,
      Err(ConfigError::InvalidValue { key: "SMTP_PORT", .. })
    ));
  }

  #[test]
  fn cors_origins_are_split_and_wildcard_means_any() {
    let config = config_from(&[("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example")]).unwrap();
    assert_eq!(config.cors.allowed_origins, vec!["https://a.example", "https://b.example"]);

    let config = config_from(&[("CORS_ALLOWED_ORIGINS", "*")]).unwrap();
    assert!(config.cors.allowed_origins.is_empty());
  }

  #[test]
  fn template_path_prefers_install_dir() {
    let install_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let resolved = resolve_template_path(PathBuf::from(DEFAULT_TEMPLATE_PATH), Some(install_dir));
    assert_eq!(resolved, install_dir.join(DEFAULT_TEMPLATE_PATH));
  }

  #[test]
  fn template_path_falls_back_to_working_dir() {
    let resolved = resolve_template_path(
      PathBuf::from(DEFAULT_TEMPLATE_PATH),
      Some(Path::new("/no/such/install/dir")),
    );
    assert_eq!(resolved, PathBuf::from(DEFAULT_TEMPLATE_PATH));

    let resolved = resolve_template_path(PathBuf::from(DEFAULT_TEMPLATE_PATH), None);
    assert_eq!(resolved, PathBuf::from(DEFAULT_TEMPLATE_PATH));
  }

  #[test]
  fn absolute_template_path_is_kept() {
    let absolute = Path::new(env!("CARGO_MANIFEST_DIR")).join("custom.html");
    let resolved = resolve_template_path(absolute.clone(), Some(Path::new("/opt/mail-relay")));
    assert_eq!(resolved, absolute);
  }

  #[test]
  fn bind_address_joins_host_and_port() {
    let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]).unwrap();
    assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
  }

  #[test]
  #[serial]
  fn from_env_reads_process_environment() {
    std::env::set_var("RATE_LIMIT_MAX", "7");
    let config = AppConfig::from_env().unwrap();
    std::env::remove_var("RATE_LIMIT_MAX");

    assert_eq!(config.rate_limit.max_requests, 7);
  }
}
