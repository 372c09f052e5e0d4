//! Outbound mail delivery.
//!
//! [`MailTransport`] is the seam the rest of the crate talks to; [`EmailService`] is the
//! SMTP implementation built on lettre's pooled async transport.

mod service;
mod types;

#[cfg(test)]
pub use service::MockMailTransport;
pub use service::{EmailService, MailTransport, TransportError};
pub use types::{OutgoingMail, SmtpConfig, DEFAULT_FROM_NAME};
