use axum::{
  http::{header, HeaderName, HeaderValue},
  Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
form-action 'self';frame-ancestors 'self';img-src 'self' data:;object-src 'none';\
script-src 'self';script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

/// Defensive response headers added to every response that does not already set them.
pub const SECURITY_HEADERS: [(HeaderName, &str); 12] = [
  (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
  (HeaderName::from_static("cross-origin-opener-policy"), "same-origin"),
  (HeaderName::from_static("cross-origin-resource-policy"), "same-origin"),
  (HeaderName::from_static("origin-agent-cluster"), "?1"),
  (header::REFERRER_POLICY, "no-referrer"),
  (header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"),
  (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
  (header::X_DNS_PREFETCH_CONTROL, "off"),
  (HeaderName::from_static("x-download-options"), "noopen"),
  (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
  (HeaderName::from_static("x-permitted-cross-domain-policies"), "none"),
  (header::X_XSS_PROTECTION, "0"),
];

pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
  S: Clone + Send + Sync + 'static,
{
  SECURITY_HEADERS.into_iter().fold(router, |router, (name, value)| {
    router.layer(SetResponseHeaderLayer::if_not_present(
      name,
      HeaderValue::from_static(value),
    ))
  })
}
