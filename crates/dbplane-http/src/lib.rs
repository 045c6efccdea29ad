//! # dbplane-http
//!
//! HTTP plumbing shared by the dbplane backend clients.
//!
//! - [`ApiRequest`] describes one call (method, path, query, JSON body)
//! - [`Transport`] sends it; [`HttpTransport`] does so over reqwest with
//!   HTTP digest authentication using an API key pair
//! - [`HttpError`] is the error every backend client returns
//! - [`api_keys`] holds the API key models both backend APIs share
//!
//! ```text
//! ┌──────────────────┐  ApiRequest   ┌───────────────┐   HTTPS    ┌─────────┐
//! │  backend client  │──────────────►│   Transport   │───────────►│   API   │
//! └──────────────────┘◄──────────────└───────────────┘◄───────────└─────────┘
//!                        JSON Value                     digest auth
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api_keys;
pub mod digest;
mod error;
mod page;
mod request;
#[cfg(feature = "test-util")]
pub mod testing;
mod transport;

pub use digest::Credentials;
pub use error::{HttpError, Result};
pub use page::Page;
pub use request::{ApiRequest, ListOptions, Method, escape};
pub use transport::{HttpTransport, Transport};

/// Decode a JSON body into a typed value.
///
/// # Errors
///
/// Returns [`HttpError::Decode`] if the body does not match `T`.
pub fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    Ok(serde_json::from_value(body)?)
}
