//! `skytap-http` is an async HTTP client for the Skytap cloud REST API.
//!
//! [`SkytapClient`] wraps every documented resource endpoint with a thin
//! method; all of them go through a single request dispatcher
//! ([`SkytapClient::request`]) that performs exactly one HTTP round trip.
//! Operations the provider completes asynchronously (deleting a published
//! service while its VM reconfigures) are wrapped in [`poll`], a
//! Fibonacci-backoff retry loop.

mod api;
mod client;
mod error;
mod options;
pub mod paths;
mod poll;
mod request;
mod types;

pub use client::SkytapClient;
pub use error::SkytapError;
pub use options::ClientOptions;
pub use poll::{poll, Fibonacci, HasStatus};
pub use request::{ApiVersion, FileUpload, RequestSpec, ResponseMode};
pub use types::{ApiData, ApiResponse, NewUser, QuotaLimits};

pub type Result<T> = std::result::Result<T, SkytapError>;
