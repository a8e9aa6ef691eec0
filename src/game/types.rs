use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
  pub direction: Point,
  pub boost_requested: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbSnapshot {
  pub id: u32,
  pub position: Point,
  pub radius: f64,
  pub color: u32,
  pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
  pub id: String,
  pub position: Point,
  pub direction: Point,
  pub radius: f64,
  pub scale: f64,
  pub score: f64,
  pub color: u32,
  pub is_boosting: bool,
  pub alive: bool,
  pub segments: Vec<Point>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub respawn_timer: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
  pub players: HashMap<String, PlayerSnapshot>,
  pub orbs: Vec<OrbSnapshot>,
}
