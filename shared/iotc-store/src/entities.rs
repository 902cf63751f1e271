//! Asset profiles, device profiles, assets and devices

use chrono::{DateTime, Utc};
use iotc_core::{generate_id, now_millis};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::catalog::{search_matches, CatalogEntry};

/// Device transport protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportType {
    #[default]
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "MQTT")]
    Mqtt,
    #[serde(rename = "CoAP")]
    Coap,
    #[serde(rename = "LWM2M")]
    Lwm2m,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialsType {
    AccessToken,
    MqttBasic,
    X509Certificate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCredentials {
    pub credentials_type: CredentialsType,
    pub credentials_id: String,
}

impl DeviceCredentials {
    fn access_token() -> Self {
        Self {
            credentials_type: CredentialsType::AccessToken,
            credentials_id: format!("token_{}", now_millis()),
        }
    }
}

// ============================================
// Asset profiles
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub profile_type: String,
    pub manufacturer: String,
    pub model: String,
    pub specifications: String,
    pub default_attributes: Map<String, Value>,
    pub rules: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAssetProfile {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub profile_type: String,
    pub manufacturer: String,
    pub model: String,
    pub specifications: String,
}

impl AssetProfile {
    pub fn new(req: CreateAssetProfile) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: req.name,
            description: req.description,
            profile_type: req.profile_type,
            manufacturer: req.manufacturer,
            model: req.model,
            specifications: req.specifications,
            default_attributes: Map::new(),
            rules: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CatalogEntry for AssetProfile {
    const KIND: &'static str = "Asset profile";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetProfileFilter {
    pub search: Option<String>,
    /// Matches the profile `type`
    pub category: Option<String>,
}

impl AssetProfileFilter {
    pub fn matches(&self, profile: &AssetProfile) -> bool {
        search_matches(self.search.as_deref(), &profile.name, &profile.description)
            && non_empty(&self.category).map_or(true, |c| c == profile.profile_type)
    }
}

// ============================================
// Device profiles
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub device_type: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_version: String,
    pub transport_type: TransportType,
    pub specifications: String,
    pub default_attributes: Map<String, Value>,
    pub alarm_rules: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDeviceProfile {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    pub device_type: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_version: String,
    pub transport_type: TransportType,
    pub specifications: String,
}

impl DeviceProfile {
    pub fn new(req: CreateDeviceProfile) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: req.name,
            description: req.description,
            device_type: req.device_type,
            manufacturer: req.manufacturer,
            model: req.model,
            firmware_version: req.firmware_version,
            transport_type: req.transport_type,
            specifications: req.specifications,
            default_attributes: Map::new(),
            alarm_rules: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CatalogEntry for DeviceProfile {
    const KIND: &'static str = "Device profile";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfileFilter {
    pub search: Option<String>,
    pub device_type: Option<String>,
}

impl DeviceProfileFilter {
    pub fn matches(&self, profile: &DeviceProfile) -> bool {
        search_matches(self.search.as_deref(), &profile.name, &profile.description)
            && non_empty(&self.device_type).map_or(true, |t| t == profile.device_type)
    }
}

// ============================================
// Assets
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub label: String,
    pub asset_profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub attributes: Map<String, Value>,
    pub additional_info: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAsset {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    pub label: String,
    pub asset_profile_id: String,
    pub parent_asset_id: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: String,
}

impl Asset {
    pub fn new(req: CreateAsset) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: req.name,
            description: req.description,
            label: req.label,
            asset_profile_id: req.asset_profile_id,
            parent_asset_id: req.parent_asset_id.filter(|p| !p.is_empty()),
            asset_type: req.asset_type,
            attributes: Map::new(),
            additional_info: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CatalogEntry for Asset {
    const KIND: &'static str = "Asset";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        search_matches(self.search.as_deref(), &asset.name, &asset.description)
            && non_empty(&self.asset_type).map_or(true, |t| t == asset.asset_type)
    }
}

// ============================================
// Devices
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub description: String,
    pub label: String,
    pub device_profile_id: String,
    pub asset_id: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub attributes: Map<String, Value>,
    pub credentials: DeviceCredentials,
    pub additional_info: Map<String, Value>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDevice {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: String,
    pub label: String,
    pub device_profile_id: String,
    pub asset_id: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

impl Device {
    pub fn new(req: CreateDevice) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: req.name,
            description: req.description,
            label: req.label,
            device_profile_id: req.device_profile_id,
            asset_id: req.asset_id,
            device_type: req.device_type,
            attributes: Map::new(),
            credentials: DeviceCredentials::access_token(),
            additional_info: Map::new(),
            is_active: true,
            last_activity_time: Some(now),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CatalogEntry for Device {
    const KIND: &'static str = "Device";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        search_matches(self.search.as_deref(), &device.name, &device.description)
            && non_empty(&self.device_type).map_or(true, |t| t == device.device_type)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
