//! I/O-free core of the TerrAvion API client.
//!
//! # Overview
//! Builds `HttpRequest` values and classifies `HttpResponse` values without
//! touching the network (host-does-IO pattern). The `terravion` crate
//! executes the actual GET requests; any other host can do the same.
//!
//! # Design
//! - `TerrAvionClient` holds only immutable configuration.
//! - Each endpoint has a `build_*` method; all responses go through the
//!   single `parse_response`, so success and failure look the same for
//!   every endpoint.
//! - Response bodies stay `serde_json::Value`; the upstream schema is not
//!   modelled here.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod options;
pub mod query;

pub use client::{is_success, TerrAvionClient, ACCESS_TOKEN_PARAM};
pub use endpoint::build_api_url;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{ClientOptions, DEFAULT_HOST};
pub use query::{BlockFilter, QueryParams, UserBlocksForMapFilter, UserLayersFilter};
