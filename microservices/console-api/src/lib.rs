//! Console API
//!
//! REST backend of the IoT administration console:
//! - Asset and device profile catalogs
//! - Asset and device registries
//! - Scoped attributes per asset/device
//! - Time-series telemetry with windowed queries and range deletes

pub mod api;
pub mod error;
pub mod state;

use iotc_core::{DependencyStatus, HealthStatus, IotcService, ReadinessStatus, Result, ServiceConfig};
use tracing::info;

pub use api::create_router;
pub use error::ApiError;
pub use state::AppState;

pub struct ConsoleService {
    config: ServiceConfig,
    state: AppState,
}

impl ConsoleService {
    pub fn new(config: ServiceConfig) -> Self {
        let state = AppState::new(config.clone());
        Self { config, state }
    }
}

#[async_trait::async_trait]
impl IotcService for ConsoleService {
    fn service_id(&self) -> &'static str {
        "console-api"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.state.uptime_seconds(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        ReadinessStatus {
            ready: true,
            dependencies: vec![DependencyStatus {
                name: "in-memory-store".to_string(),
                available: true,
                latency_ms: Some(0),
            }],
        }
    }

    async fn shutdown(&self) -> Result<()> {
        for counter in [
            self.state.attributes.writes(),
            self.state.attributes.deletes(),
            self.state.telemetry.written(),
            self.state.telemetry.deleted(),
            &self.state.failed_requests,
        ] {
            info!(metric = counter.name(), value = counter.get(), "Final counter");
        }
        let stored = self.state.telemetry.stored();
        info!(metric = stored.name(), value = stored.get(), "Final gauge");
        info!(
            attributes = self.state.attributes.len(),
            telemetry_samples = self.state.telemetry.len(),
            "Shutting down Console API, in-memory data is discarded"
        );
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(
            http = %self.config.http_bind,
            environment = ?self.config.environment,
            "Starting Console API server"
        );

        let router = create_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.config.http_bind).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
