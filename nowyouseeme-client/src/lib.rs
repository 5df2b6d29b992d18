//! NowYouSeeMe Client
//!
//! Typed REST client for the NowYouSeeMe API plus the `nowyouseeme`
//! command-line tool built on it. Request and response types are shared
//! with the server crate.

pub mod api_client;
pub mod config;
pub mod error;

pub use api_client::RestClient;
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use error::ClientError;
