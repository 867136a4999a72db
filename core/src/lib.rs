//! Blocking client for the Shipwire warehouse API.
//!
//! # Overview
//! Orders, products (base, insert, kit, virtual kit), returns, receivings and
//! stock are exposed as thin facades over one dispatcher. Every call returns
//! a `Response` envelope that normalizes the API's success, warning and error
//! reporting; only infrastructure failures surface as `ApiError`.
//!
//! ```no_run
//! use shipwire_core::{Config, DefaultClient, Query};
//!
//! let client = DefaultClient::new(Config::new("user@example.test", "password"));
//! let response = client.orders().list(Query::new().with("status", "canceled"))?;
//! if response.ok() {
//!     println!("{} orders", response.items().len());
//! } else {
//!     eprintln!("{}", response.error_summary().unwrap_or_default());
//! }
//! # Ok::<(), shipwire_core::ApiError>(())
//! ```
//!
//! # Design
//! - `Client` is stateless apart from its configuration snapshot and
//!   transport; share it freely between threads.
//! - `build` and `parse` are pure, `Transport::perform` is the only I/O, so
//!   the whole request/response mapping is testable without a network.
//! - Facades are route tables (`resources::*::LIST`, `FIND`, ...) feeding
//!   `Client::send`.
//! - The `ureq` feature (default) provides `UreqTransport` and `DefaultClient`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod resources;
pub mod response;
#[cfg(feature = "ureq")]
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::Client;
#[cfg(feature = "ureq")]
pub use client::DefaultClient;
pub use config::{configure, current, Config, ConfigUpdate};
pub use error::{ApiError, ConfigError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use request::{Query, RequestDescriptor};
pub use resources::{Classification, MemberRoute, ResourceId, Route};
pub use response::{Response, ValidationError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
