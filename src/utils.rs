use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::Request};

pub mod error;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Rate-limit key for a request: the peer IP when the server was started with connect info.
pub fn client_key<B>(request: &Request<B>) -> String {
  request
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip().to_string())
    .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
