use crate::game::constants::{INITIAL_ACTIVE_ORBS, TICK_DELTA, TICK_RATE, TOTAL_ORBS};
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_address: IpAddr,
  pub port: u16,
  /// Audit logging is off unless this is set.
  pub database_url: Option<String>,
  pub room: RoomConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
  pub tick_rate: u32,
  /// Reference frames advanced per tick.
  pub tick_delta: f64,
  pub total_orbs: usize,
  pub initial_active_orbs: usize,
}

impl Default for RoomConfig {
  fn default() -> Self {
    Self {
      tick_rate: TICK_RATE,
      tick_delta: TICK_DELTA,
      total_orbs: TOTAL_ORBS,
      initial_active_orbs: INITIAL_ACTIVE_ORBS,
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
      port: 8787,
      database_url: None,
      room: RoomConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut config = Self::default();

    if let Some(value) = parsed::<IpAddr>(&lookup, "BIND_ADDRESS") {
      config.bind_address = value;
    }
    if let Some(value) = parsed::<u16>(&lookup, "PORT") {
      config.port = value;
    }
    config.database_url = lookup("DATABASE_URL")
      .map(|value| value.trim().to_string())
      .filter(|value| !value.is_empty());

    if let Some(value) = parsed::<u32>(&lookup, "TICK_RATE") {
      if value > 0 {
        config.room.tick_rate = value;
      } else {
        tracing::warn!("TICK_RATE must be > 0, using default");
      }
    }
    if let Some(value) = parsed::<f64>(&lookup, "TICK_DELTA") {
      if value.is_finite() && value > 0.0 {
        config.room.tick_delta = value;
      } else {
        tracing::warn!("TICK_DELTA must be a positive number, using default");
      }
    }
    if let Some(value) = parsed::<usize>(&lookup, "TOTAL_ORBS") {
      config.room.total_orbs = value;
    }
    if let Some(value) = parsed::<usize>(&lookup, "INITIAL_ACTIVE_ORBS") {
      config.room.initial_active_orbs = value;
    }
    config.room.initial_active_orbs = config.room.initial_active_orbs.min(config.room.total_orbs);

    config
  }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
  let raw = lookup(key)?;
  match raw.trim().parse::<T>() {
    Ok(value) => Some(value),
    Err(_) => {
      tracing::warn!("Invalid {key} '{raw}', using default");
      None
    }
  }
}
