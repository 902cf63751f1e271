use std::sync::Arc;

use console_api::ConsoleService;
use iotc_core::{IotcError, MicroserviceRuntime, Result, ServiceConfig};
use iotc_tracing::{init_tracing, TracingConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env()?;

    init_tracing(&TracingConfig::new(
        &config.service_name,
        &config.log_level,
        config.json_logs,
    ))
    .map_err(|e| IotcError::Config(e.to_string()))?;

    info!("Starting Console API");

    let service = Arc::new(ConsoleService::new(config));
    MicroserviceRuntime::run(service).await
}
