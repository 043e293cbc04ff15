pub mod config;
pub mod error;
pub mod programs;
pub mod telemetry;
