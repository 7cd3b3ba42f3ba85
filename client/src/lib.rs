//! Typed client for the TerrAvion imagery API.
//!
//! # Overview
//! [`TerrAvion`] (async, reqwest) and [`BlockingTerrAvion`] (ureq, behind the
//! default `blocking` feature) execute the requests that `terravion-core`
//! builds. Every call is a single GET; a 2xx response resolves with the body
//! as returned, anything else with [`ApiError::Http`], and a request that
//! never got a response with [`ApiError::Transport`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), terravion::ApiError> {
//! use terravion::{ClientOptions, TerrAvion, UserBlocksForMapFilter};
//!
//! let client = TerrAvion::new(ClientOptions::new("my-token"));
//! let me = client.get_user_id().await?;
//! let user_id = me["userId"].as_str().unwrap_or_default();
//! let filter = UserBlocksForMapFilter {
//!     season: Some("2024".to_string()),
//!     ..Default::default()
//! };
//! let blocks = client.get_user_blocks_for_map(user_id, &filter).await?;
//! # let _ = blocks;
//! # Ok(())
//! # }
//! ```
//!
//! Requests are traced at `debug` level and transport failures at `warn`
//! through `tracing`; the access token is never part of an event.

#[cfg(feature = "blocking")]
pub mod blocking;
mod client;

#[cfg(feature = "blocking")]
pub use blocking::BlockingTerrAvion;
pub use client::TerrAvion;
pub use terravion_core::{
    ApiError, BlockFilter, ClientOptions, HttpMethod, HttpRequest, HttpResponse, QueryParams,
    TerrAvionClient, UserBlocksForMapFilter, UserLayersFilter, DEFAULT_HOST,
};
