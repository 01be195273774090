//! In-memory stand-in for the top.gg API.
//!
//! Serves the endpoints the client uses, seeded with a bot and a few users.
//! Every route except the `/test` helpers requires the configured token in
//! the `Authorization` header.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Bot owned by the server's token; `/bots/votes` and `/bots/stats` act on it.
pub const BOT_ID: &str = "264811613708746752";
pub const VOTER_ID: &str = "140862798832861184";
pub const OWNER_ID: &str = "129908908096487424";
/// Largest `shard_count` accepted by `POST /bots/stats`.
pub const MAX_SHARDS: u64 = 10_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub def_avatar: String,
    pub lib: String,
    pub prefix: String,
    pub shortdesc: String,
    pub tags: Vec<String>,
    pub owners: Vec<String>,
    pub guilds: Vec<String>,
    pub date: String,
    pub certified_bot: bool,
    pub points: u64,
    pub monthly_points: u64,
    pub donatebotguildid: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub def_avatar: String,
    pub supporter: bool,
    pub certified_dev: bool,
    pub r#mod: bool,
    pub web_mod: bool,
    pub admin: bool,
}

/// Voter entry as listed by `/bots/votes`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Voter {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
}

impl From<&User> for Voter {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            discriminator: user.discriminator.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_count: Option<u64>,
    pub shards: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_count: Option<u64>,
}

#[derive(Deserialize)]
pub struct PostStats {
    pub server_count: u64,
    #[serde(default)]
    pub shard_id: u64,
    #[serde(default = "one")]
    pub shard_count: u64,
}

fn one() -> u64 {
    1
}

#[derive(Deserialize)]
pub struct BotsParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckParams {
    pub user_id: String,
}

#[derive(Default)]
pub struct Store {
    pub bots: HashMap<String, Bot>,
    pub users: HashMap<String, User>,
    pub votes: Vec<String>,
    pub shards: Vec<u64>,
    pub weekend: bool,
}

impl Store {
    /// One bot, its owner and one user who has not voted yet.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.bots.insert(
            BOT_ID.to_string(),
            Bot {
                id: BOT_ID.to_string(),
                username: "Luca".to_string(),
                discriminator: "1375".to_string(),
                avatar: None,
                def_avatar: "6debd47ed13483642cf09e832ed0bc1b".to_string(),
                lib: "discord.js".to_string(),
                prefix: "-".to_string(),
                shortdesc: "Luca is a bot for managing and informing members of the server".to_string(),
                tags: vec!["Moderation".to_string()],
                owners: vec![OWNER_ID.to_string()],
                guilds: Vec::new(),
                date: "2017-04-26T18:08:17.125Z".to_string(),
                certified_bot: false,
                points: 397,
                monthly_points: 19,
                donatebotguildid: String::new(),
            },
        );
        for (id, username, discriminator) in [
            (OWNER_ID, "Tonkku", "0001"),
            (VOTER_ID, "Xetera", "0001"),
        ] {
            store.users.insert(
                id.to_string(),
                User {
                    id: id.to_string(),
                    username: username.to_string(),
                    discriminator: discriminator.to_string(),
                    avatar: None,
                    def_avatar: "322c936a8c8be1b803cd94861bdfa868".to_string(),
                    supporter: false,
                    certified_dev: id == OWNER_ID,
                    r#mod: false,
                    web_mod: false,
                    admin: false,
                },
            );
        }
        store
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub token: Arc<str>,
    pub db: Db,
}

impl AppState {
    pub fn new(token: &str, store: Store) -> Self {
        Self {
            token: Arc::from(token),
            db: Arc::new(RwLock::new(store)),
        }
    }
}

pub fn app(token: &str) -> Router {
    app_with_state(AppState::new(token, Store::seeded()))
}

pub fn app_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/bots", get(list_bots))
        .route("/bots/votes", get(list_votes))
        .route("/bots/check", get(check_vote))
        .route("/bots/stats", post(post_stats))
        .route("/bots/{id}", get(get_bot))
        .route("/bots/{id}/stats", get(get_stats))
        .route("/users/{id}", get(get_user))
        .route("/weekend", get(weekend))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/test/votes/{user_id}", post(record_vote))
        .merge(api)
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == &*state.token);
    if !authorized {
        debug!(uri = %request.uri(), "rejecting unauthorized request");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
    }
    next.run(request).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})))
}

async fn list_bots(State(state): State<AppState>, Query(params): Query<BotsParams>) -> Json<Value> {
    let store = state.db.read().await;
    let needle = params
        .search
        .as_deref()
        .map(|s| s.split_once(':').map_or(s, |(_, v)| v).trim().to_lowercase());

    let mut matching: Vec<&Bot> = store
        .bots
        .values()
        .filter(|bot| {
            needle
                .as_deref()
                .map_or(true, |n| bot.username.to_lowercase().contains(n))
        })
        .collect();
    matching.sort_by(|a, b| a.id.cmp(&b.id));

    let total = matching.len();
    let limit = params.limit.unwrap_or(50).min(500);
    let offset = params.offset.unwrap_or(0);
    let results: Vec<&Bot> = matching.into_iter().skip(offset).take(limit).collect();

    Json(json!({
        "results": results,
        "limit": limit,
        "offset": offset,
        "count": results.len(),
        "total": total,
    }))
}

async fn get_bot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bot>, (StatusCode, Json<Value>)> {
    let store = state.db.read().await;
    store.bots.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stats>, (StatusCode, Json<Value>)> {
    let store = state.db.read().await;
    if !store.bots.contains_key(&id) {
        return Err(not_found());
    }
    if id != BOT_ID || store.shards.is_empty() {
        return Ok(Json(Stats::default()));
    }
    Ok(Json(Stats {
        server_count: Some(store.shards.iter().sum()),
        shards: store.shards.clone(),
        shard_count: Some(store.shards.len() as u64),
    }))
}

async fn post_stats(
    State(state): State<AppState>,
    Json(input): Json<PostStats>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if input.shard_count > MAX_SHARDS {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("shard_count must be at most {MAX_SHARDS}")})),
        ));
    }
    if input.shard_count == 0 || input.shard_id >= input.shard_count {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "shard_id must be below shard_count"})),
        ));
    }
    let mut store = state.db.write().await;
    store.shards.resize(input.shard_count as usize, 0);
    store.shards[input.shard_id as usize] = input.server_count;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_votes(State(state): State<AppState>) -> Json<Vec<Voter>> {
    let store = state.db.read().await;
    let voters = store
        .votes
        .iter()
        .filter_map(|id| store.users.get(id))
        .map(Voter::from)
        .collect();
    Json(voters)
}

async fn check_vote(State(state): State<AppState>, Query(params): Query<CheckParams>) -> Json<Value> {
    let store = state.db.read().await;
    let voted = u8::from(store.votes.contains(&params.user_id));
    Json(json!({ "voted": voted }))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let store = state.db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn weekend(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    Json(json!({ "is_weekend": store.weekend }))
}

async fn record_vote(State(state): State<AppState>, Path(user_id): Path<String>) -> StatusCode {
    let mut store = state.db.write().await;
    if !store.users.contains_key(&user_id) {
        return StatusCode::NOT_FOUND;
    }
    if !store.votes.contains(&user_id) {
        store.votes.push(user_id);
    }
    StatusCode::NO_CONTENT
}
