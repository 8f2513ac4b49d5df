// ds8k-api: Async Rust client for the IBM DS8000 management REST API

pub mod auth;
pub mod client;
mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, DEFAULT_PORT, Scheme};
pub use client::Ds8kClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
