pub mod app;
pub mod audit;
pub mod config;
pub mod game;
pub mod protocol;
pub mod transport;
