//! IoT Console Tracing
//!
//! Structured logging setup and lightweight in-process metrics.

mod config;
mod metrics;
mod tracing_setup;

pub use config::TracingConfig;
pub use metrics::{Counter, Gauge};
pub use tracing_setup::init_tracing;

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing initialization failed: {0}")]
    Init(String),
}
