pub mod arena;
pub mod constants;
pub mod creature;
pub mod math;
pub mod orbs;
pub mod room;
pub mod types;
