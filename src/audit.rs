use crate::app::time::now_millis;
use anyhow::Context;
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
  Connect,
  Disconnect,
}

impl AuditKind {
  pub fn as_str(self) -> &'static str {
    match self {
      AuditKind::Connect => "connect",
      AuditKind::Disconnect => "disconnect",
    }
  }
}

#[derive(Debug, Clone)]
pub struct AuditEvent {
  pub id: String,
  pub kind: AuditKind,
  pub timestamp: i64,
  pub metadata: Value,
}

impl AuditEvent {
  pub fn connect(id: &str, players: usize) -> Self {
    Self::new(id, AuditKind::Connect, players)
  }

  pub fn disconnect(id: &str, players: usize) -> Self {
    Self::new(id, AuditKind::Disconnect, players)
  }

  fn new(id: &str, kind: AuditKind, players: usize) -> Self {
    Self {
      id: id.to_string(),
      kind,
      timestamp: now_millis(),
      metadata: json!({ "players": players }),
    }
  }
}

/// Connect/disconnect log backed by SQLite. Writes are fire-and-forget: the
/// caller never waits and a failed insert only produces a warning.
#[derive(Debug, Clone)]
pub struct AuditLog {
  db: SqlitePool,
}

impl AuditLog {
  pub async fn open(database_url: &str) -> anyhow::Result<Self> {
    ensure_db_dir(database_url)?;
    let max_connections = if is_memory_url(database_url) { 1 } else { 5 };
    let db = SqlitePoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .with_context(|| format!("failed to open audit database {database_url}"))?;
    sqlx::migrate!("./migrations")
      .run(&db)
      .await
      .context("failed to run audit migrations")?;
    Ok(Self { db })
  }

  pub fn record(&self, event: AuditEvent) {
    let db = self.db.clone();
    tokio::spawn(async move {
      if let Err(error) = insert_event(&db, &event).await {
        tracing::warn!(?error, player_id = %event.id, kind = event.kind.as_str(), "audit write failed");
      }
    });
  }
}

async fn insert_event(db: &SqlitePool, event: &AuditEvent) -> Result<(), sqlx::Error> {
  sqlx::query("INSERT INTO audit_events (id, kind, timestamp, metadata) VALUES (?, ?, ?, ?)")
    .bind(&event.id)
    .bind(event.kind.as_str())
    .bind(event.timestamp)
    .bind(event.metadata.to_string())
    .execute(db)
    .await?;
  Ok(())
}

fn is_memory_url(database_url: &str) -> bool {
  database_url.starts_with("sqlite::memory:") || database_url.ends_with(":memory:")
}

fn ensure_db_dir(database_url: &str) -> anyhow::Result<()> {
  if is_memory_url(database_url) {
    return Ok(());
  }
  let path = database_url
    .strip_prefix("sqlite://")
    .or_else(|| database_url.strip_prefix("sqlite:"));
  let Some(path) = path else { return Ok(()) };
  let path = path.split('?').next().unwrap_or(path);
  if path.is_empty() {
    return Ok(());
  }
  let db_path = PathBuf::from(path);
  if let Some(parent) = db_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  if !db_path.exists() {
    std::fs::File::create(&db_path)
      .with_context(|| format!("failed to create {}", db_path.display()))?;
  }
  Ok(())
}
