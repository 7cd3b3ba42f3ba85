use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Token accepted by `app` when none is configured.
pub const DEFAULT_TOKEN: &str = "test-token";

/// User the accepted token belongs to.
pub const TOKEN_OWNER: &str = "u1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub season: String,
    pub acres: f64,
    /// Ring of `[lng, lat]` pairs.
    pub outline: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub layer_id: String,
    pub block_id: String,
    pub user_id: String,
    pub product: String,
    pub layer_date_epoch: i64,
}

/// Path and query string of one request the server received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Every request seen by a router, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RequestLog(Arc<RwLock<Vec<RecordedRequest>>>);

impl RequestLog {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.0.read().await.clone()
    }

    /// For callers outside a tokio runtime.
    pub fn blocking_requests(&self) -> Vec<RecordedRequest> {
        self.0.blocking_read().clone()
    }

    pub async fn last(&self) -> Option<RecordedRequest> {
        self.0.read().await.last().cloned()
    }

    async fn push(&self, request: RecordedRequest) {
        self.0.write().await.push(request);
    }
}

pub struct Fixtures {
    pub blocks: HashMap<String, Block>,
    pub users: HashMap<String, User>,
    pub layers: Vec<Layer>,
}

impl Default for Fixtures {
    fn default() -> Self {
        let blocks = [
            block("b1", "North Field", "u1", "2024", 40.5, [-121.74, 38.54]),
            block("b2", "Creek Side", "u1", "2023", 12.0, [-121.70, 38.50]),
            block("b3", "Home Orchard", "u2", "2024", 8.25, [-120.90, 37.10]),
        ];
        let users = [
            user("u1", "grower@example.com", "Dana"),
            user("u2", "agronomist@example.com", "Riley"),
        ];
        let layers = vec![
            layer("l1", "b1", "u1", "NC", 1_718_000_000),
            layer("l2", "b1", "u1", "CIR", 1_718_000_000),
            layer("l3", "b2", "u1", "NC", 1_690_000_000),
            layer("l4", "b3", "u2", "THERMAL", 1_719_000_000),
        ];
        Self {
            blocks: blocks.into_iter().map(|b| (b.id.clone(), b)).collect(),
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            layers,
        }
    }
}

fn block(id: &str, name: &str, user_id: &str, season: &str, acres: f64, origin: [f64; 2]) -> Block {
    let [lng, lat] = origin;
    Block {
        id: id.to_string(),
        name: name.to_string(),
        user_id: user_id.to_string(),
        season: season.to_string(),
        acres,
        outline: vec![
            [lng, lat],
            [lng + 0.01, lat],
            [lng + 0.01, lat + 0.01],
            [lng, lat + 0.01],
            [lng, lat],
        ],
    }
}

fn user(id: &str, email: &str, first_name: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
    }
}

fn layer(layer_id: &str, block_id: &str, user_id: &str, product: &str, epoch: i64) -> Layer {
    Layer {
        layer_id: layer_id.to_string(),
        block_id: block_id.to_string(),
        user_id: user_id.to_string(),
        product: product.to_string(),
        layer_date_epoch: epoch,
    }
}

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    fixtures: Arc<Fixtures>,
    log: RequestLog,
}

type Params = Query<HashMap<String, String>>;

/// Router with default fixtures and a private request log.
pub fn app(token: &str) -> Router {
    router(token, RequestLog::default())
}

/// Router with default fixtures that records into `log`.
pub fn router(token: &str, log: RequestLog) -> Router {
    let state = AppState {
        token: Arc::from(token),
        fixtures: Arc::new(Fixtures::default()),
        log,
    };
    Router::new()
        .route("/blocks/{id}", get(get_block))
        .route("/blocks/{id}/geom.geojson", get(get_geojson))
        .route("/userBlocks/getUserBlocksForMap", get(get_user_blocks_for_map))
        .route("/users/getUserId", get(get_user_id))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/getLayers", get(get_user_layers))
        .route("/layers/getLayersFromBlockId", get(get_layers_from_block_id))
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    serve(listener, app(token)).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// Record the request, then reject it unless `access_token` matches.
async fn authorize(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    tracing::debug!(%path, params = query.len(), "request");

    let authorized = query
        .iter()
        .any(|(k, v)| k == "access_token" && v.as_str() == &*state.token);
    state.log.push(RecordedRequest { path, query }).await;

    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "Authorization Required");
    }
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": {
            "statusCode": status.as_u16(),
            "name": "Error",
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

fn not_found(kind: &str, id: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("Unknown \"{kind}\" id \"{id}\"."))
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, Response> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, &format!("{key} is a required argument")))
}

async fn get_block(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.fixtures.blocks.get(&id) {
        Some(block) => Json(block.clone()).into_response(),
        None => not_found("TaBlock", &id),
    }
}

async fn get_geojson(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(block) = state.fixtures.blocks.get(&id) else {
        return not_found("TaBlock", &id);
    };
    Json(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "blockId": block.id, "name": block.name },
            "geometry": { "type": "Polygon", "coordinates": [block.outline] },
        }],
    }))
    .into_response()
}

async fn get_user_blocks_for_map(State(state): State<AppState>, Query(params): Params) -> Response {
    let user_id = match required(&params, "userId") {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let season = params.get("season");
    let mut blocks: Vec<&Block> = state
        .fixtures
        .blocks
        .values()
        .filter(|b| b.user_id == user_id)
        .filter(|b| season.is_none_or(|s| *s == b.season))
        .collect();
    blocks.sort_by(|a, b| a.id.cmp(&b.id));
    Json(blocks).into_response()
}

async fn get_user_id() -> Json<Value> {
    Json(json!({ "userId": TOKEN_OWNER }))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.fixtures.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found("TaUser", &id),
    }
}

async fn get_user_layers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    if !state.fixtures.users.contains_key(&id) {
        return not_found("TaUser", &id);
    }
    let block_id = params.get("blockId");
    let layers: Vec<&Layer> = state
        .fixtures
        .layers
        .iter()
        .filter(|l| l.user_id == id)
        .filter(|l| block_id.is_none_or(|b| *b == l.block_id))
        .collect();
    Json(layers).into_response()
}

async fn get_layers_from_block_id(State(state): State<AppState>, Query(params): Params) -> Response {
    let (user_id, block_id) = match (required(&params, "userId"), required(&params, "blockId")) {
        (Ok(user_id), Ok(block_id)) => (user_id, block_id),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    let layers: Vec<&Layer> = state
        .fixtures
        .layers
        .iter()
        .filter(|l| l.user_id == user_id && l.block_id == block_id)
        .collect();
    Json(layers).into_response()
}
