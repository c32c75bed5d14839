// libre-api: Async Rust client for the LibreNMS v0 devices API

pub mod classify;
pub mod client;
pub mod devices;
pub mod error;
pub mod transport;

pub use client::{Endpoint, LibreClient, PostOutcome, QueryPairs, RawResponse};
pub use error::Error;
pub use transport::{ConnectionConfig, TlsMode};

// Re-exported so callers can name methods without a direct reqwest dependency.
pub use reqwest::Method;
