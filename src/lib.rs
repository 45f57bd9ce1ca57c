//! btc-etl: Bitcoin spot price ETL poller and CPU-time sampler
//!
//! This library provides:
//! - Spot price extraction from the Coinbase HTTP API
//! - Payload validation into typed quotes
//! - Append-only storage on PostgreSQL or SQLite
//! - A timed poller driving extract → transform → load
//! - CPU time sampling from `/proc/stat`
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod etl;
pub mod quote;
pub mod store;
pub mod system;
pub mod telemetry;
