//! IoT Console Store
//!
//! Process-local state for the console:
//! - `AttributeStore`: scoped key/value attributes per asset or device
//! - `TelemetryStore`: append-only time series with windowed queries
//! - `Catalog`: asset profiles, device profiles, assets and devices
//!
//! Every store is cheap to clone and shares its state across clones.

pub mod attributes;
pub mod catalog;
pub mod entities;
pub mod telemetry;
pub mod value;

pub use attributes::{AttributeFilter, AttributeRecord, AttributeStore};
pub use catalog::{validated, Catalog, CatalogEntry};
pub use entities::{
    Asset, AssetFilter, AssetProfile, AssetProfileFilter, CreateAsset, CreateAssetProfile,
    CreateDevice, CreateDeviceProfile, CredentialsType, Device, DeviceCredentials, DeviceFilter,
    DeviceProfile, DeviceProfileFilter, TransportType,
};
pub use telemetry::{SampleFilter, TelemetrySample, TelemetryStore, TimeseriesQuery, TimeseriesResult, TsValue};
