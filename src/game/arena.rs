use super::creature::Creature;
use super::math::distance_sq;
use super::orbs::OrbPool;

/// Collision authority over the orb pool and an externally owned set of
/// creatures.
#[derive(Debug)]
pub struct Arena {
  orbs: OrbPool,
}

impl Arena {
  pub fn new(orbs: OrbPool) -> Self {
    Self { orbs }
  }

  pub fn orbs(&self) -> &OrbPool {
    &self.orbs
  }

  pub fn orbs_mut(&mut self) -> &mut OrbPool {
    &mut self.orbs
  }

  /// Advances orb respawns, then resolves creature/orb and creature/body
  /// contacts against the positions from the previous tick.
  pub fn update(&mut self, creatures: &mut [Creature], dt: f64) {
    self.orbs.update(dt);
    self.consume_orbs(creatures);
    self.resolve_body_hits(creatures);
  }

  /// Orbs are tested in id order against the radius the creature has at that
  /// moment, so growth from one orb can reach the next.
  fn consume_orbs(&mut self, creatures: &mut [Creature]) {
    for creature in creatures.iter_mut() {
      if !creature.is_alive() {
        continue;
      }
      let head = creature.position();
      for id in 0..self.orbs.len() as u32 {
        let Some(orb) = self.orbs.get(id) else { break };
        if !orb.active {
          continue;
        }
        let reach = orb.radius + creature.radius();
        if distance_sq(head, orb.position) > reach * reach {
          continue;
        }
        let gain = (orb.radius / 2.0).floor();
        self.orbs.kill(id);
        creature.apply_score_delta(gain);
      }
    }
  }

  fn resolve_body_hits(&mut self, creatures: &mut [Creature]) {
    let dead = body_hits(creatures);
    for index in dead {
      creatures[index].die(&mut self.orbs);
    }
  }
}

/// Indices of creatures whose head touches another living creature's body.
/// Heads never hit heads and a creature never hits itself.
pub fn body_hits(creatures: &[Creature]) -> Vec<usize> {
  let mut dead = Vec::new();
  for (a_index, a) in creatures.iter().enumerate() {
    if !a.is_alive() {
      continue;
    }
    let head = a.position();
    let reach_sq = a.radius() * a.radius();
    let hit = creatures.iter().enumerate().any(|(b_index, b)| {
      b_index != a_index
        && b.is_alive()
        && b
          .segments()
          .iter()
          .skip(1)
          .any(|segment| distance_sq(head, *segment) <= reach_sq)
    });
    if hit {
      dead.push(a_index);
    }
  }
  dead
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::constants::{BASE_RADIUS, MIN_SCORE, RESPAWN_DELAY};
  use crate::game::types::Point;

  fn creature_at(id: &str, position: Point) -> Creature {
    Creature::spawn_at(id.to_string(), position)
  }

  fn laid_out(id: &str, start: Point, step: Point, len: usize) -> Creature {
    let mut creature = creature_at(id, start);
    creature.segments = (0..len)
      .map(|i| Point::new(start.x + step.x * i as f64, start.y + step.y * i as f64))
      .collect();
    creature
  }

  #[test]
  fn head_eats_overlapping_orbs() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let near = arena.orbs_mut().spawn(Point::new(10.0, 0.0), 8.0);
    let also_near = arena.orbs_mut().spawn(Point::new(-5.0, 5.0), 6.0);
    let far = arena.orbs_mut().spawn(Point::new(500.0, 0.0), 8.0);
    let mut creatures = vec![creature_at("a", Point::ORIGIN)];

    arena.update(&mut creatures, 1.0);

    assert!(!arena.orbs().get(near).expect("orb").active);
    assert!(!arena.orbs().get(also_near).expect("orb").active);
    assert!(arena.orbs().get(far).expect("orb").active);
    assert_eq!(creatures[0].score(), MIN_SCORE + 4.0 + 3.0);
    assert_eq!(arena.orbs().pending_respawns(), 2);
  }

  #[test]
  fn touching_edge_counts_as_contact() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let id = arena
      .orbs_mut()
      .spawn(Point::new(BASE_RADIUS + 6.0, 0.0), 6.0);
    let mut creatures = vec![creature_at("a", Point::ORIGIN)];
    arena.update(&mut creatures, 1.0);
    assert!(!arena.orbs().get(id).expect("orb").active);
  }

  #[test]
  fn growth_from_one_orb_reaches_the_next() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let big = arena.orbs_mut().spawn(Point::new(31.0, 0.0), 11.0);
    let small = arena.orbs_mut().spawn(Point::new(-26.5, 0.0), 6.0);
    let mut creatures = vec![creature_at("a", Point::ORIGIN)];

    arena.update(&mut creatures, 1.0);

    assert!(!arena.orbs().get(big).expect("orb").active);
    assert!(!arena.orbs().get(small).expect("orb").active);
    assert_eq!(creatures[0].score(), MIN_SCORE + 5.0 + 3.0);
  }

  #[test]
  fn dead_creatures_do_not_eat() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let id = arena.orbs_mut().spawn(Point::ORIGIN, 8.0);
    let mut creature = creature_at("a", Point::new(3000.0, 0.0));
    creature.die(arena.orbs_mut());
    creature.position = Point::ORIGIN;
    let mut creatures = vec![creature];

    arena.update(&mut creatures, 1.0);
    assert!(arena.orbs().get(id).expect("orb").active);
    assert_eq!(creatures[0].score(), MIN_SCORE);
  }

  #[test]
  fn head_on_body_kills_only_the_attacker() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let b = laid_out("b", Point::new(100.0, 0.0), Point::new(10.0, 0.0), 7);
    let a = laid_out("a", b.segments()[2], Point::new(0.0, 10.0), 7);
    let mut creatures = vec![a, b];

    arena.update(&mut creatures, 1.0);

    assert!(!creatures[0].is_alive());
    assert_eq!(creatures[0].respawn_timer(), Some(RESPAWN_DELAY));
    assert!(creatures[1].is_alive());
  }

  #[test]
  fn head_to_head_is_not_a_hit() {
    let a = laid_out("a", Point::ORIGIN, Point::new(-50.0, 0.0), 3);
    let b = laid_out("b", Point::new(5.0, 0.0), Point::new(50.0, 0.0), 3);
    assert!(body_hits(&[a, b]).is_empty());
  }

  #[test]
  fn own_body_never_counts() {
    let coiled = laid_out("a", Point::ORIGIN, Point::ORIGIN, 7);
    assert!(body_hits(&[coiled]).is_empty());
  }

  #[test]
  fn dead_bodies_are_harmless() {
    let mut orbs = OrbPool::new(0, 0);
    let mut b = laid_out("b", Point::new(100.0, 0.0), Point::new(10.0, 0.0), 7);
    let a = creature_at("a", b.segments()[3]);
    b.die(&mut orbs);
    assert!(body_hits(&[a, b]).is_empty());
  }

  #[test]
  fn mutual_hits_kill_both_regardless_of_order() {
    let step = Point::new(10.0, 0.0);
    let mut a = laid_out("a", Point::ORIGIN, step, 7);
    let mut b = laid_out("b", Point::new(0.0, 200.0), step, 7);
    a.position = b.segments()[4];
    a.segments[0] = a.position;
    b.position = a.segments()[4];
    b.segments[0] = b.position;

    let forward = body_hits(&[a.clone(), b.clone()]);
    let backward = body_hits(&[b, a]);
    assert_eq!(forward, vec![0, 1]);
    assert_eq!(backward, vec![0, 1]);
  }

  #[test]
  fn every_hit_creature_dies_exactly_once() {
    let mut arena = Arena::new(OrbPool::new(0, 0));
    let step = Point::new(10.0, 0.0);
    let b = laid_out("b", Point::ORIGIN, step, 7);
    let c = laid_out("c", Point::ORIGIN, step, 7);
    let a = creature_at("a", Point::new(20.0, 0.0));
    let mut creatures = vec![a, b, c];

    arena.update(&mut creatures, 1.0);

    assert!(creatures.iter().all(|creature| !creature.is_alive()));
    let drops_each = (MIN_SCORE / 8.0).floor() as usize;
    assert_eq!(arena.orbs().len(), drops_each * 3);
  }
}
