use super::constants::{
  MAX_COLOR, OFFSCREEN, ORB_MIN_RADIUS, ORB_RADIUS_SPREAD, ORB_SPAWN_MARGIN,
  REFERENCE_FRAMES_PER_SEC, RESPAWN_DELAY, WORLD_RADIUS,
};
use super::math::random_point_in_disc;
use super::types::{OrbSnapshot, Point};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Orb {
  pub id: u32,
  pub position: Point,
  pub radius: f64,
  pub color: u32,
  pub active: bool,
}

impl Orb {
  pub fn snapshot(&self) -> OrbSnapshot {
    OrbSnapshot {
      id: self.id,
      position: self.position,
      radius: self.radius,
      color: self.color,
      active: self.active,
    }
  }
}

#[derive(Debug, Clone, Copy)]
struct RespawnEntry {
  id: u32,
  timer: f64,
}

/// Fixed population of orbs that only ever grows. Slot index and orb id are
/// the same number: ids are handed out sequentially and slots are never
/// removed.
#[derive(Debug)]
pub struct OrbPool {
  orbs: Vec<Orb>,
  respawn_queue: Vec<RespawnEntry>,
}

impl OrbPool {
  pub fn new(total: usize, initial_active: usize) -> Self {
    let mut pool = Self {
      orbs: Vec::with_capacity(total),
      respawn_queue: Vec::new(),
    };
    for _ in 0..total {
      pool.create_orb();
    }

    let mut rng = rand::thread_rng();
    for orb in pool.orbs.iter_mut().take(initial_active) {
      orb.position = random_orb_position(&mut rng);
      orb.active = true;
    }
    pool
  }

  fn create_orb(&mut self) -> u32 {
    let mut rng = rand::thread_rng();
    let id = self.orbs.len() as u32;
    self.orbs.push(Orb {
      id,
      position: Point::new(OFFSCREEN, OFFSCREEN),
      radius: (ORB_MIN_RADIUS + rng.gen_range(0..ORB_RADIUS_SPREAD)) as f64,
      color: rng.gen_range(0..MAX_COLOR),
      active: false,
    });
    id
  }

  /// Activates an orb at `position`, reusing an inactive slot when one exists.
  pub fn spawn(&mut self, position: Point, radius: f64) -> u32 {
    let reusable = self.orbs.iter().position(|orb| !orb.active);
    let id = match reusable {
      Some(index) => {
        let id = self.orbs[index].id;
        self.respawn_queue.retain(|entry| entry.id != id);
        id
      }
      None => self.create_orb(),
    };

    let orb = &mut self.orbs[id as usize];
    orb.position = position;
    orb.radius = radius;
    orb.active = true;
    id
  }

  /// Deactivates the orb and schedules its respawn. Killing an inactive orb
  /// does nothing.
  pub fn kill(&mut self, id: u32) {
    let Some(orb) = self.orbs.get_mut(id as usize) else { return };
    if !orb.active {
      return;
    }
    orb.active = false;
    self.respawn_queue.push(RespawnEntry {
      id,
      timer: RESPAWN_DELAY,
    });
  }

  pub fn update(&mut self, dt: f64) {
    let mut rng = rand::thread_rng();
    let orbs = &mut self.orbs;
    self.respawn_queue.retain_mut(|entry| {
      entry.timer -= dt / REFERENCE_FRAMES_PER_SEC;
      if entry.timer > 0.0 {
        return true;
      }
      if let Some(orb) = orbs.get_mut(entry.id as usize) {
        orb.position = random_orb_position(&mut rng);
        orb.active = true;
      }
      false
    });
  }

  pub fn get(&self, id: u32) -> Option<&Orb> {
    self.orbs.get(id as usize)
  }

  pub fn active_orbs(&self) -> impl Iterator<Item = &Orb> + '_ {
    self.orbs.iter().filter(|orb| orb.active)
  }

  pub fn active_count(&self) -> usize {
    self.active_orbs().count()
  }

  pub fn len(&self) -> usize {
    self.orbs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.orbs.is_empty()
  }

  pub fn pending_respawns(&self) -> usize {
    self.respawn_queue.len()
  }

  pub fn snapshot(&self) -> Vec<OrbSnapshot> {
    self.active_orbs().map(Orb::snapshot).collect()
  }
}

fn random_orb_position<R: Rng + ?Sized>(rng: &mut R) -> Point {
  random_point_in_disc(rng, WORLD_RADIUS - ORB_SPAWN_MARGIN)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::constants::{INITIAL_ACTIVE_ORBS, TOTAL_ORBS};
  use crate::game::math::length;

  fn first_active(pool: &OrbPool) -> u32 {
    pool.active_orbs().next().expect("active orb").id
  }

  #[test]
  fn new_pool_activates_initial_subset() {
    let pool = OrbPool::new(1000, 250);
    assert_eq!(pool.len(), 1000);
    assert_eq!(pool.active_count(), 250);
    assert_eq!(pool.orbs.iter().filter(|orb| !orb.active).count(), 750);
  }

  #[test]
  fn inactive_orbs_start_offscreen() {
    let pool = OrbPool::new(20, 5);
    for orb in pool.orbs.iter().filter(|orb| !orb.active) {
      assert_eq!(orb.position, Point::new(OFFSCREEN, OFFSCREEN));
    }
  }

  #[test]
  fn initial_orbs_are_inside_the_arena() {
    let pool = OrbPool::new(TOTAL_ORBS, INITIAL_ACTIVE_ORBS);
    for orb in pool.active_orbs() {
      assert!(length(orb.position) < WORLD_RADIUS - ORB_SPAWN_MARGIN);
      assert!(orb.radius >= 6.0 && orb.radius <= 11.0);
    }
  }

  #[test]
  fn ids_match_slots() {
    let pool = OrbPool::new(50, 10);
    for (index, orb) in pool.orbs.iter().enumerate() {
      assert_eq!(orb.id as usize, index);
    }
  }

  #[test]
  fn spawn_places_orb_at_position() {
    let mut pool = OrbPool::new(10, 2);
    let before = pool.active_count();
    let id = pool.spawn(Point::new(123.0, -456.0), 20.0);
    let orb = pool.get(id).expect("orb");
    assert!(orb.active);
    assert_eq!(orb.position, Point::new(123.0, -456.0));
    assert_eq!(orb.radius, 20.0);
    assert_eq!(pool.active_count(), before + 1);
  }

  #[test]
  fn spawn_reuses_killed_orb_and_cancels_respawn() {
    let mut pool = OrbPool::new(3, 3);
    let id = first_active(&pool);
    pool.kill(id);
    assert_eq!(pool.pending_respawns(), 1);

    let reused = pool.spawn(Point::new(50.0, 60.0), 10.0);
    assert_eq!(reused, id);
    assert_eq!(pool.pending_respawns(), 0);
    assert_eq!(pool.len(), 3);
    let orb = pool.get(id).expect("orb");
    assert!(orb.active);
    assert_eq!(orb.position, Point::new(50.0, 60.0));
  }

  #[test]
  fn spawn_grows_pool_when_full() {
    let mut pool = OrbPool::new(4, 4);
    let id = pool.spawn(Point::new(1.0, 1.0), 5.0);
    assert_eq!(id, 4);
    assert_eq!(pool.len(), 5);
    assert_eq!(pool.active_count(), 5);
  }

  #[test]
  fn kill_schedules_respawn() {
    let mut pool = OrbPool::new(10, 5);
    let id = first_active(&pool);
    pool.kill(id);
    assert!(!pool.get(id).expect("orb").active);
    assert_eq!(pool.respawn_queue.len(), 1);
    assert_eq!(pool.respawn_queue[0].id, id);
    assert_eq!(pool.respawn_queue[0].timer, RESPAWN_DELAY);
    assert!(pool.active_orbs().all(|orb| orb.id != id));
  }

  #[test]
  fn kill_twice_schedules_once() {
    let mut pool = OrbPool::new(10, 5);
    let id = first_active(&pool);
    pool.kill(id);
    pool.kill(id);
    assert_eq!(pool.pending_respawns(), 1);
  }

  #[test]
  fn kill_unknown_id_is_ignored() {
    let mut pool = OrbPool::new(2, 2);
    pool.kill(99);
    assert_eq!(pool.pending_respawns(), 0);
    assert_eq!(pool.active_count(), 2);
  }

  #[test]
  fn respawns_after_delay_and_not_before() {
    let mut pool = OrbPool::new(10, 5);
    let id = first_active(&pool);
    pool.kill(id);

    let frames = (RESPAWN_DELAY * REFERENCE_FRAMES_PER_SEC) as usize;
    for _ in 0..frames - 1 {
      pool.update(1.0);
    }
    assert!(!pool.get(id).expect("orb").active);

    pool.update(1.0);
    pool.update(1.0);
    assert!(pool.get(id).expect("orb").active);
    assert_eq!(pool.pending_respawns(), 0);
  }

  #[test]
  fn respawn_moves_orb() {
    let mut pool = OrbPool::new(10, 5);
    let id = first_active(&pool);
    pool.kill(id);
    let old = pool.get(id).expect("orb").position;

    pool.update(RESPAWN_DELAY * REFERENCE_FRAMES_PER_SEC);

    let orb = pool.get(id).expect("orb");
    assert!(orb.active);
    assert_ne!(orb.position, old);
  }

  #[test]
  fn snapshot_lists_only_active_orbs() {
    let mut pool = OrbPool::new(10, 4);
    let id = first_active(&pool);
    pool.kill(id);
    let snapshot = pool.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.iter().all(|orb| orb.active && orb.id != id));
  }
}
