use super::constants::{
  BASE_LENGTH, BASE_RADIUS, BOOST_DRAIN, DROPPED_ORB_RADIUS, DROP_JITTER, DROP_SCORE_DIVISOR,
  GROWTH_PER_SCORE, INPUT_EPSILON, MAX_COLOR, MIN_SCORE, PLAYER_SPAWN_FRACTION, PLAYER_SPEED,
  REFERENCE_FRAMES_PER_SEC, RESPAWN_DELAY, SCALE_FACTOR, SEGMENT_SPACING, TURN_SPEED,
  WORLD_RADIUS,
};
use super::math::{distance, follow, random_point_in_disc, steer};
use super::orbs::OrbPool;
use super::types::{PlayerInput, PlayerSnapshot, Point};
use rand::Rng;

/// One player's snake. `segments[0]` is the head and always equals
/// `position` after an update.
#[derive(Debug, Clone)]
pub struct Creature {
  pub id: String,
  pub color: u32,
  pub(crate) position: Point,
  pub(crate) direction: Point,
  pub(crate) segments: Vec<Point>,
  pub(crate) score: f64,
  pub(crate) scale: f64,
  pub(crate) is_boosting: bool,
  pub(crate) alive: bool,
  pub(crate) respawn_timer: Option<f64>,
  pub(crate) input: PlayerInput,
}

impl Creature {
  pub fn new(id: String) -> Self {
    let position = random_spawn_point(&mut rand::thread_rng());
    Self::spawn_at(id, position)
  }

  pub fn spawn_at(id: String, position: Point) -> Self {
    Self {
      id,
      color: rand::thread_rng().gen_range(0..MAX_COLOR),
      position,
      direction: Point::new(1.0, 0.0),
      segments: fresh_chain(position),
      score: MIN_SCORE,
      scale: 1.0,
      is_boosting: false,
      alive: true,
      respawn_timer: None,
      input: PlayerInput::default(),
    }
  }

  pub fn position(&self) -> Point {
    self.position
  }

  pub fn segments(&self) -> &[Point] {
    &self.segments
  }

  pub fn score(&self) -> f64 {
    self.score
  }

  pub fn radius(&self) -> f64 {
    BASE_RADIUS * self.scale
  }

  pub fn is_alive(&self) -> bool {
    self.alive
  }

  pub fn is_boosting(&self) -> bool {
    self.is_boosting
  }

  pub fn respawn_timer(&self) -> Option<f64> {
    self.respawn_timer
  }

  pub fn desired_length(&self) -> usize {
    BASE_LENGTH + ((self.score - MIN_SCORE) * GROWTH_PER_SCORE).floor() as usize
  }

  pub fn set_input(&mut self, direction: Point, boost_requested: bool) {
    self.input = PlayerInput {
      direction,
      boost_requested,
    };
  }

  /// Adds `amount` to the score (never below the minimum) and moves the
  /// segment count one step toward the length that score calls for.
  pub fn apply_score_delta(&mut self, amount: f64) {
    self.score = (self.score + amount).max(MIN_SCORE);
    self.scale = 1.0 + (self.score - MIN_SCORE).sqrt() * SCALE_FACTOR;

    let desired = self.desired_length();
    if self.segments.len() < desired {
      let tail = self.segments.last().copied().unwrap_or(self.position);
      self.segments.push(tail);
    } else if self.segments.len() > desired {
      self.segments.pop();
    }
  }

  pub fn update(&mut self, orbs: &mut OrbPool, dt: f64) {
    if !self.alive {
      self.try_respawn(dt);
      return;
    }

    self.is_boosting = self.input.boost_requested && self.score > MIN_SCORE;
    if self.is_boosting {
      self.apply_score_delta(-(BOOST_DRAIN * dt) / REFERENCE_FRAMES_PER_SEC);
      if self.score == MIN_SCORE {
        self.is_boosting = false;
      }
    }

    let wanted = self.input.direction;
    if wanted.x.abs() > INPUT_EPSILON || wanted.y.abs() > INPUT_EPSILON {
      self.direction = steer(self.direction, wanted, TURN_SPEED);
      let speed = if self.is_boosting {
        PLAYER_SPEED * 2.0
      } else {
        PLAYER_SPEED
      };
      self.position.x += self.direction.x * speed;
      self.position.y += self.direction.y * speed;
    }

    if let Some(head) = self.segments.first_mut() {
      *head = self.position;
    }

    if distance(self.position, Point::ORIGIN) - self.radius() > WORLD_RADIUS {
      self.die(orbs);
      return;
    }

    for i in 1..self.segments.len() {
      self.segments[i] = follow(self.segments[i - 1], self.segments[i], SEGMENT_SPACING);
    }
  }

  /// Scatters orbs along the body, resets the score and starts the respawn
  /// countdown. Dead creatures are left untouched.
  pub fn die(&mut self, orbs: &mut OrbPool) {
    if !self.alive {
      return;
    }
    self.alive = false;
    self.is_boosting = false;
    self.respawn_timer = Some(RESPAWN_DELAY);
    tracing::debug!(player_id = %self.id, score = self.score, "player died");

    let mut rng = rand::thread_rng();
    let drop_count = (self.score / DROP_SCORE_DIVISOR).floor() as usize;
    let last_index = self.segments.len().saturating_sub(1);
    for i in 0..drop_count {
      let t = i as f64 / drop_count as f64;
      let index = (t * last_index as f64).floor() as usize;
      let Some(base) = self.segments.get(index).copied() else { continue };
      let jitter_x = (rng.gen::<f64>() - 0.5) * DROP_JITTER * 2.0;
      let jitter_y = (rng.gen::<f64>() - 0.5) * DROP_JITTER * 2.0;
      orbs.spawn(
        Point::new(base.x + jitter_x, base.y + jitter_y),
        DROPPED_ORB_RADIUS,
      );
    }

    self.score = MIN_SCORE;
    self.apply_score_delta(0.0);
  }

  fn try_respawn(&mut self, dt: f64) {
    let Some(timer) = self.respawn_timer else { return };
    let remaining = timer - dt / REFERENCE_FRAMES_PER_SEC;
    if remaining > 0.0 {
      self.respawn_timer = Some(remaining);
      return;
    }

    let position = random_spawn_point(&mut rand::thread_rng());
    self.alive = true;
    self.respawn_timer = None;
    self.position = position;
    self.segments = fresh_chain(position);
    tracing::debug!(player_id = %self.id, "player respawned");
  }

  pub fn snapshot(&self) -> PlayerSnapshot {
    PlayerSnapshot {
      id: self.id.clone(),
      position: self.position,
      direction: self.direction,
      radius: self.radius(),
      scale: self.scale,
      score: self.score,
      color: self.color,
      is_boosting: self.is_boosting,
      alive: self.alive,
      segments: self.segments.clone(),
      respawn_timer: self.respawn_timer,
    }
  }
}

fn fresh_chain(position: Point) -> Vec<Point> {
  vec![position; BASE_LENGTH + 1]
}

fn random_spawn_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
  random_point_in_disc(rng, WORLD_RADIUS * PLAYER_SPAWN_FRACTION)
}
