//! Async TerrAvion client.
//!
//! # Design
//! `TerrAvion` pairs the I/O-free `TerrAvionClient` with a `reqwest::Client`.
//! Request construction and status classification stay in the core; this
//! type only performs the GET. Both halves are cheap to clone and safe to
//! share, so concurrent calls need no coordination.

use serde_json::Value;
use terravion_core::{
    ApiError, BlockFilter, ClientOptions, HttpMethod, HttpRequest, HttpResponse, QueryParams,
    TerrAvionClient, UserBlocksForMapFilter, UserLayersFilter,
};

#[derive(Debug, Clone)]
pub struct TerrAvion {
    core: TerrAvionClient,
    http: reqwest::Client,
}

impl TerrAvion {
    pub fn new(options: ClientOptions) -> Self {
        Self::with_http_client(options, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, pool
    /// limits). The client's own timeout is the only one applied.
    pub fn with_http_client(options: ClientOptions, http: reqwest::Client) -> Self {
        Self {
            core: TerrAvionClient::new(options),
            http,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ClientOptions::from_env())
    }

    pub fn core(&self) -> &TerrAvionClient {
        &self.core
    }

    /// GET any endpoint. `access_token` only applies when the client was
    /// built without a token.
    pub async fn get(
        &self,
        endpoint: &str,
        params: QueryParams,
        access_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = self.core.build_get(endpoint, params, access_token);
        self.execute(request).await
    }

    /// Send a request built by the core and classify the response.
    pub async fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            params = request.query.len(),
            "dispatching request"
        );

        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
        };
        let response = builder
            .query(request.query.as_pairs())
            .send()
            .await
            .map_err(|e| transport_failure(&request, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(&request, e))?;
        tracing::debug!(url = %request.url, status, "response received");

        self.core.parse_response(&request, HttpResponse { status, body })
    }

    /// `GET /blocks/{id}`
    pub async fn get_block(&self, block_id: &str, filter: &BlockFilter) -> Result<Value, ApiError> {
        let request = self.core.build_get_block(block_id, filter)?;
        self.execute(request).await
    }

    /// `GET /blocks/{id}/geom.geojson`
    pub async fn get_geojson(&self, block_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_geojson(block_id)).await
    }

    /// `GET /layers/getLayersFromBlockId`
    pub async fn get_layers_from_block_id(&self, user_id: &str, block_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_layers_from_block_id(user_id, block_id))
            .await
    }

    /// `GET /users/{id}`
    pub async fn get_user(&self, user_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_user(user_id)).await
    }

    /// `GET /userBlocks/getUserBlocksForMap`
    pub async fn get_user_blocks_for_map(
        &self,
        user_id: &str,
        filter: &UserBlocksForMapFilter,
    ) -> Result<Value, ApiError> {
        let request = self.core.build_get_user_blocks_for_map(user_id, filter)?;
        self.execute(request).await
    }

    /// `GET /users/getUserId`
    pub async fn get_user_id(&self) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_user_id()).await
    }

    /// `GET /users/{id}/getLayers`
    pub async fn get_user_layers(&self, user_id: &str, filter: &UserLayersFilter) -> Result<Value, ApiError> {
        let request = self.core.build_get_user_layers(user_id, filter)?;
        self.execute(request).await
    }
}

/// reqwest puts the full URL, query string included, into its errors. Strip
/// it so the token never reaches logs or callers.
fn transport_failure(request: &HttpRequest, err: reqwest::Error) -> ApiError {
    let err = err.without_url();
    tracing::warn!(url = %request.url, error = %err, "transport failure");
    ApiError::transport(err)
}
