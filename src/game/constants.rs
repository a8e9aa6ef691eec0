pub const WORLD_RADIUS: f64 = 2000.0;
pub const RESPAWN_DELAY: f64 = 3.0;

pub const PLAYER_SPEED: f64 = 12.0;
pub const BOOST_DRAIN: f64 = 10.0;
pub const MIN_SCORE: f64 = 10.0;

pub const BASE_RADIUS: f64 = 20.0;
pub const SCALE_FACTOR: f64 = 0.02;

pub const BASE_LENGTH: usize = 6;
pub const SEGMENT_SPACING: f64 = 10.0;
pub const GROWTH_PER_SCORE: f64 = 1.0 / 10.0;

pub const TOTAL_ORBS: usize = 1000;
pub const INITIAL_ACTIVE_ORBS: usize = 250;

pub const TICK_RATE: u32 = 20;
/// Timers count down in units of 1/60 s regardless of the tick rate.
pub const REFERENCE_FRAMES_PER_SEC: f64 = 60.0;
pub const TICK_DELTA: f64 = 1.0;

pub const TURN_SPEED: f64 = 0.15;
pub const INPUT_EPSILON: f64 = 1e-3;

pub const ORB_SPAWN_MARGIN: f64 = 10.0;
pub const ORB_MIN_RADIUS: u32 = 6;
pub const ORB_RADIUS_SPREAD: u32 = 6;
pub const DROPPED_ORB_RADIUS: f64 = 5.0;
pub const DROP_SCORE_DIVISOR: f64 = 8.0;
pub const DROP_JITTER: f64 = 5.0;
pub const OFFSCREEN: f64 = -9999.0;

pub const PLAYER_SPAWN_FRACTION: f64 = 0.8;

pub const MAX_COLOR: u32 = 0xffffff;
