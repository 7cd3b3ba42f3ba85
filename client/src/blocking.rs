//! Blocking TerrAvion client backed by ureq.
//!
//! Same surface as [`crate::TerrAvion`], for callers without an async
//! runtime. The agent must return 4xx/5xx responses as data
//! (`http_status_as_error(false)`) so their bodies reach `ApiError::Http`;
//! an agent that still reports status errors yields `Http` failures with an
//! empty body.

use std::fmt;

use serde_json::Value;
use terravion_core::{
    ApiError, BlockFilter, ClientOptions, HttpMethod, HttpRequest, HttpResponse, QueryParams,
    TerrAvionClient, UserBlocksForMapFilter, UserLayersFilter,
};

#[derive(Clone)]
pub struct BlockingTerrAvion {
    core: TerrAvionClient,
    agent: ureq::Agent,
}

impl fmt::Debug for BlockingTerrAvion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingTerrAvion")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Agent with status-code errors disabled; no timeout beyond ureq's defaults.
pub fn default_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

impl BlockingTerrAvion {
    pub fn new(options: ClientOptions) -> Self {
        Self::with_agent(options, default_agent())
    }

    pub fn with_agent(options: ClientOptions, agent: ureq::Agent) -> Self {
        Self {
            core: TerrAvionClient::new(options),
            agent,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ClientOptions::from_env())
    }

    pub fn core(&self) -> &TerrAvionClient {
        &self.core
    }

    pub fn get(
        &self,
        endpoint: &str,
        params: QueryParams,
        access_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = self.core.build_get(endpoint, params, access_token);
        self.execute(request)
    }

    /// Execute an `HttpRequest` with ureq and classify the response.
    pub fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            params = request.query.len(),
            "dispatching request"
        );

        let result = match request.method {
            HttpMethod::Get => self
                .agent
                .get(&request.url)
                .query_pairs(request.query.iter())
                .call(),
        };
        let mut response = match result {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(status)) => {
                return self.core.parse_response(
                    &request,
                    HttpResponse {
                        status,
                        body: String::new(),
                    },
                );
            }
            Err(e) => return Err(transport_failure(&request, e)),
        };

        // ureq caps bodies at 10 MiB by default; whole-field geometry can be larger.
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| transport_failure(&request, e))?;
        tracing::debug!(url = %request.url, status, "response received");

        self.core.parse_response(&request, HttpResponse { status, body })
    }

    pub fn get_block(&self, block_id: &str, filter: &BlockFilter) -> Result<Value, ApiError> {
        let request = self.core.build_get_block(block_id, filter)?;
        self.execute(request)
    }

    pub fn get_geojson(&self, block_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_geojson(block_id))
    }

    pub fn get_layers_from_block_id(&self, user_id: &str, block_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_layers_from_block_id(user_id, block_id))
    }

    pub fn get_user(&self, user_id: &str) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_user(user_id))
    }

    pub fn get_user_blocks_for_map(
        &self,
        user_id: &str,
        filter: &UserBlocksForMapFilter,
    ) -> Result<Value, ApiError> {
        let request = self.core.build_get_user_blocks_for_map(user_id, filter)?;
        self.execute(request)
    }

    pub fn get_user_id(&self) -> Result<Value, ApiError> {
        self.execute(self.core.build_get_user_id())
    }

    pub fn get_user_layers(&self, user_id: &str, filter: &UserLayersFilter) -> Result<Value, ApiError> {
        let request = self.core.build_get_user_layers(user_id, filter)?;
        self.execute(request)
    }
}

fn transport_failure(request: &HttpRequest, err: ureq::Error) -> ApiError {
    tracing::warn!(url = %request.url, error = %err, "transport failure");
    ApiError::transport(err)
}
