use super::types::Point;
use rand::Rng;

pub fn length(point: Point) -> f64 {
  (point.x * point.x + point.y * point.y).sqrt()
}

pub fn normalize(point: Point) -> Point {
  let len = length(point);
  if !len.is_finite() || len == 0.0 {
    return Point::ORIGIN;
  }
  Point {
    x: point.x / len,
    y: point.y / len,
  }
}

pub fn distance(a: Point, b: Point) -> f64 {
  distance_sq(a, b).sqrt()
}

pub fn distance_sq(a: Point, b: Point) -> f64 {
  let dx = a.x - b.x;
  let dy = a.y - b.y;
  dx * dx + dy * dy
}

/// Weighted blend `current * (1 - weight) + target * weight`, renormalized.
pub fn steer(current: Point, target: Point, weight: f64) -> Point {
  let blended = Point {
    x: current.x * (1.0 - weight) + target.x * weight,
    y: current.y * (1.0 - weight) + target.y * weight,
  };
  if length(blended) > 0.0 {
    normalize(blended)
  } else {
    blended
  }
}

/// Moves `follower` toward `leader` until it sits exactly `spacing` away.
/// Points already within `spacing` are returned unchanged.
pub fn follow(leader: Point, follower: Point, spacing: f64) -> Point {
  let dx = leader.x - follower.x;
  let dy = leader.y - follower.y;
  let dist = (dx * dx + dy * dy).sqrt();
  if dist <= spacing {
    return follower;
  }
  let t = spacing / dist;
  Point {
    x: leader.x - dx * t,
    y: leader.y - dy * t,
  }
}

/// Uniform angle and uniform radial distance. Density is higher near the
/// center than an area-uniform sample.
pub fn random_point_in_disc<R: Rng + ?Sized>(rng: &mut R, max_radius: f64) -> Point {
  let angle = rng.gen::<f64>() * std::f64::consts::PI * 2.0;
  let radius = rng.gen::<f64>() * max_radius;
  Point {
    x: angle.cos() * radius,
    y: angle.sin() * radius,
  }
}
