//! Core domain types shared by the store and the REST surface

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::IotcError;

/// Kind of entity that owns attributes and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Asset,
    Device,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Device => "DEVICE",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = IotcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSET" => Ok(Self::Asset),
            "DEVICE" => Ok(Self::Device),
            other => Err(IotcError::validation(format!("Invalid entity type: {}", other))),
        }
    }
}

/// Attribute scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeScope {
    ClientScope,
    ServerScope,
    SharedScope,
}

impl AttributeScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientScope => "CLIENT_SCOPE",
            Self::ServerScope => "SERVER_SCOPE",
            Self::SharedScope => "SHARED_SCOPE",
        }
    }
}

impl fmt::Display for AttributeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeScope {
    type Err = IotcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT_SCOPE" => Ok(Self::ClientScope),
            "SERVER_SCOPE" => Ok(Self::ServerScope),
            "SHARED_SCOPE" => Ok(Self::SharedScope),
            other => Err(IotcError::validation(format!("Invalid attribute scope: {}", other))),
        }
    }
}

/// Owner of attributes and telemetry. The id is not checked against
/// the asset or device catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub entity_id: String,
}

impl EntityRef {
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
        }
    }

    pub fn asset(entity_id: impl Into<String>) -> Self {
        Self::new(EntityType::Asset, entity_id)
    }

    pub fn device(entity_id: impl Into<String>) -> Self {
        Self::new(EntityType::Device, entity_id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fresh record identifier
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
