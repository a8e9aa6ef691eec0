use crate::game::types::{PlayerSnapshot, Point, WorldSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
  #[error("malformed input message: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("direction is not finite: ({x}, {y})")]
  NonFiniteDirection { x: f64, y: f64 },
}

/// Inbound frame. Older clients send `mousePos` or `dir` plus `mouseDown`; all
/// spellings are accepted, and a `type` tag is ignored if present.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMessage {
  #[serde(alias = "mousePos", alias = "dir")]
  pub direction: Point,
  #[serde(default, alias = "mouseDown")]
  pub boost_requested: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
  Init {
    #[serde(rename = "playerId")]
    player_id: &'a str,
  },
  PlayerJoin {
    player: PlayerSnapshot,
  },
  PlayerLeave {
    #[serde(rename = "playerId")]
    player_id: &'a str,
  },
  WorldUpdate {
    #[serde(flatten)]
    world: WorldSnapshot,
  },
}

impl ServerMessage<'_> {
  pub fn encode(&self) -> String {
    // Every payload is plain data with string keys.
    serde_json::to_string(self).unwrap_or_default()
  }
}

pub fn decode_input(text: &str) -> Result<InputMessage, ProtocolError> {
  let message: InputMessage = serde_json::from_str(text)?;
  let Point { x, y } = message.direction;
  if !x.is_finite() || !y.is_finite() {
    return Err(ProtocolError::NonFiniteDirection { x, y });
  }
  Ok(message)
}
