//! VVS departure feed transport.
//!
//! This module is the only part of the crate that touches I/O. It
//! provides the wire DTOs for the feed, an HTTP client for the proxy
//! endpoint, and a mock client with the same interface for tests and
//! offline development.

mod client;
mod error;
mod mock;
mod types;

pub use client::{Transport, VvsClient, VvsConfig};
pub use error::{ConfigError, FetchError};
pub use mock::MockVvsClient;
pub use types::{DepartureTime, RawDeparture};
