pub mod config;
pub mod dedup;
pub mod error;
pub mod intake;
pub mod scoring;
pub mod telemetry;
