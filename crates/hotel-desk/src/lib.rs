pub mod config;
pub mod error;
pub mod front_desk;
pub mod telemetry;
