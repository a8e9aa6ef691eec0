use axum::{
  extract::{State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use slither_arena_server::audit::AuditLog;
use slither_arena_server::config::ServerConfig;
use slither_arena_server::game::room::Room;
use slither_arena_server::transport::ws_session::handle_socket;

#[derive(Clone)]
struct AppState {
  room: Room,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
  ok: bool,
  players: usize,
  active_orbs: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env();
  tracing::debug!(?config, "loaded configuration");

  let audit = match &config.database_url {
    Some(url) => Some(AuditLog::open(url).await?),
    None => None,
  };

  let state = AppState {
    room: Room::spawn(&config.room, audit),
  };

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/ws", get(ws_handler))
    .layer(cors)
    .with_state(state);

  let address = SocketAddr::new(config.bind_address, config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
  let stats = state.room.stats().await;
  Json(HealthResponse {
    ok: stats.is_some(),
    players: stats.map(|stats| stats.players).unwrap_or(0),
    active_orbs: stats.map(|stats| stats.active_orbs).unwrap_or(0),
  })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
  let room = state.room.clone();
  ws.on_upgrade(move |socket| handle_socket(socket, room))
}
