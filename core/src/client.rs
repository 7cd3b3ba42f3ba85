//! Stateless request builder and response classifier for the TerrAvion API.
//!
//! # Design
//! `TerrAvionClient` holds only the immutable configuration. Every endpoint
//! is split into a `build_*` method that produces an `HttpRequest` and the
//! shared `parse_response`, which classifies an `HttpResponse`. Both halves
//! of the dispatcher live here so token resolution and status handling are
//! identical for every host that executes the requests.

use serde_json::Value;

use crate::endpoint::build_api_url;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{ClientOptions, DEFAULT_HOST};
use crate::query::{BlockFilter, QueryParams, UserBlocksForMapFilter, UserLayersFilter};

/// Query parameter that carries the access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Synchronous, stateless client for the TerrAvion API.
///
/// Builds `HttpRequest` values and classifies `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct TerrAvionClient {
    access_token: String,
    host: String,
    debug: bool,
}

impl TerrAvionClient {
    pub fn new(options: ClientOptions) -> Self {
        let host = options.host.trim_end_matches('/');
        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        Self {
            access_token: options.access_token,
            host: host.to_string(),
            debug: options.debug,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The `debug` option as given. Nothing in the client reads it.
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn build_api_url(&self, endpoint: &str) -> String {
        build_api_url(&self.host, endpoint)
    }

    /// Pick the token for one request: the configured token when non-empty,
    /// else a non-empty per-call override, else none.
    pub fn resolve_access_token<'a>(&'a self, override_token: Option<&'a str>) -> Option<&'a str> {
        if !self.access_token.is_empty() {
            return Some(&self.access_token);
        }
        override_token.filter(|t| !t.is_empty())
    }

    /// Build a GET for any endpoint. `access_token` is a per-call override
    /// that only applies when the client has no configured token.
    pub fn build_get(
        &self,
        endpoint: &str,
        mut params: QueryParams,
        access_token: Option<&str>,
    ) -> HttpRequest {
        match self.resolve_access_token(access_token) {
            Some(token) => params.insert(ACCESS_TOKEN_PARAM, token),
            None => {
                params.remove(ACCESS_TOKEN_PARAM);
            }
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: self.build_api_url(endpoint),
            query: params,
        }
    }

    pub fn build_get_block(&self, block_id: &str, filter: &BlockFilter) -> Result<HttpRequest, ApiError> {
        let params = QueryParams::from_filter(filter)?;
        Ok(self.build_get(&format!("/blocks/{block_id}"), params, None))
    }

    pub fn build_get_geojson(&self, block_id: &str) -> HttpRequest {
        self.build_get(&format!("/blocks/{block_id}/geom.geojson"), QueryParams::new(), None)
    }

    pub fn build_get_layers_from_block_id(&self, user_id: &str, block_id: &str) -> HttpRequest {
        let params = [("userId", user_id), ("blockId", block_id)].into_iter().collect();
        self.build_get("/layers/getLayersFromBlockId", params, None)
    }

    pub fn build_get_user(&self, user_id: &str) -> HttpRequest {
        self.build_get(&format!("/users/{user_id}"), QueryParams::new(), None)
    }

    /// The filter fields come first; `userId` is appended after them.
    pub fn build_get_user_blocks_for_map(
        &self,
        user_id: &str,
        filter: &UserBlocksForMapFilter,
    ) -> Result<HttpRequest, ApiError> {
        let mut params = QueryParams::from_filter(filter)?;
        params.insert("userId", user_id);
        Ok(self.build_get("/userBlocks/getUserBlocksForMap", params, None))
    }

    pub fn build_get_user_id(&self) -> HttpRequest {
        self.build_get("/users/getUserId", QueryParams::new(), None)
    }

    pub fn build_get_user_layers(
        &self,
        user_id: &str,
        filter: &UserLayersFilter,
    ) -> Result<HttpRequest, ApiError> {
        let params = QueryParams::from_filter(filter)?;
        Ok(self.build_get(&format!("/users/{user_id}/getLayers"), params, None))
    }

    /// Classify the response to `request`.
    ///
    /// 2xx yields the decoded body untouched. Anything else becomes
    /// `ApiError::Http` with the body as `meta`. Bodies that are not JSON are
    /// kept as a JSON string.
    pub fn parse_response(&self, request: &HttpRequest, response: HttpResponse) -> Result<Value, ApiError> {
        let body = decode_body(response.body);
        if is_success(response.status) {
            return Ok(body);
        }
        Err(ApiError::Http {
            status: response.status,
            message: format!("{} - {} failed", response.status, request.url),
            meta: body,
        })
    }
}

impl Default for TerrAvionClient {
    fn default() -> Self {
        Self::new(ClientOptions::default())
    }
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn decode_body(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}
