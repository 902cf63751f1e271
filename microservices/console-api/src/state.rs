//! Shared handler state

use iotc_core::ServiceConfig;
use iotc_store::{Asset, AssetProfile, AttributeStore, Catalog, Device, DeviceProfile, TelemetryStore};
use iotc_tracing::Counter;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers. Clones share every store.
#[derive(Clone)]
pub struct AppState {
    pub attributes: AttributeStore,
    pub telemetry: TelemetryStore,
    pub asset_profiles: Catalog<AssetProfile>,
    pub device_profiles: Catalog<DeviceProfile>,
    pub assets: Catalog<Asset>,
    pub devices: Catalog<Device>,
    pub config: Arc<ServiceConfig>,
    pub failed_requests: Counter,
    start_time: Instant,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            attributes: AttributeStore::new(),
            telemetry: TelemetryStore::new(),
            asset_profiles: Catalog::new(),
            device_profiles: Catalog::new(),
            assets: Catalog::new(),
            devices: Catalog::new(),
            config: Arc::new(config),
            failed_requests: Counter::new("failed_requests"),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}
