use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
  time::{Duration, Instant},
};

use axum::{
  extract::{Request, State},
  http::{header, HeaderMap, HeaderName, HeaderValue},
  middleware::Next,
  response::{IntoResponse, Response},
};

use crate::{
  config::RateLimitConfig,
  utils::{
    client_key,
    error::{AppError, RATE_LIMITED_MESSAGE},
  },
};

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
  pub allowed: bool,
  pub limit: u32,
  pub remaining: u32,
  /// Time until the client's current window ends.
  pub reset_after: Duration,
}

impl RateLimitDecision {
  fn write_headers(&self, headers: &mut HeaderMap) {
    let reset_secs = self.reset_after.as_secs() + u64::from(self.reset_after.subsec_nanos() > 0);
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs));
    if !self.allowed {
      headers.insert(header::RETRY_AFTER, HeaderValue::from(reset_secs));
    }
  }
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
  started_at: Instant,
  hits: u32,
}

struct Clients {
  windows: HashMap<String, ClientWindow>,
  last_sweep: Instant,
}

/// Per-client request counter over a fixed window.
///
/// Counting and checking happen under one lock, so concurrent requests from the same
/// client can never both observe the last free slot.
pub struct RateLimiter {
  window: Duration,
  max_requests: u32,
  clients: Mutex<Clients>,
}

impl RateLimiter {
  pub fn new(config: RateLimitConfig) -> Self {
    Self {
      window: config.window,
      max_requests: config.max_requests,
      clients: Mutex::new(Clients {
        windows: HashMap::new(),
        last_sweep: Instant::now(),
      }),
    }
  }

  pub fn check(&self, key: &str, now: Instant) -> RateLimitDecision {
    let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

    if now.saturating_duration_since(clients.last_sweep) >= self.window {
      let window = self.window;
      clients
        .windows
        .retain(|_, w| now.saturating_duration_since(w.started_at) < window);
      clients.last_sweep = now;
    }

    let entry = clients.windows.entry(key.to_string()).or_insert(ClientWindow {
      started_at: now,
      hits: 0,
    });
    if now.saturating_duration_since(entry.started_at) >= self.window {
      *entry = ClientWindow {
        started_at: now,
        hits: 0,
      };
    }
    entry.hits = entry.hits.saturating_add(1);

    RateLimitDecision {
      allowed: entry.hits <= self.max_requests,
      limit: self.max_requests,
      remaining: self.max_requests.saturating_sub(entry.hits),
      reset_after: self
        .window
        .saturating_sub(now.saturating_duration_since(entry.started_at)),
    }
  }

  pub fn tracked_clients(&self) -> usize {
    self.clients.lock().unwrap_or_else(PoisonError::into_inner).windows.len()
  }
}

pub async fn rate_limit(State(limiter): State<Arc<RateLimiter>>, request: Request, next: Next) -> Response {
  let key = client_key(&request);
  let decision = limiter.check(&key, Instant::now());

  let mut response = if decision.allowed {
    next.run(request).await
  } else {
    tracing::debug!("Rate limit exceeded for client {}", key);
    AppError::too_many_requests(RATE_LIMITED_MESSAGE).into_response()
  };

  decision.write_headers(response.headers_mut());
  response
}
