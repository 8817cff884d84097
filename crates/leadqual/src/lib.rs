pub mod config;
pub mod error;
pub mod ingest;
pub mod qualification;
pub mod telemetry;
