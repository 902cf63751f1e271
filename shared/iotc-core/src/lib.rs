//! IoT Console Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait the console services implement
//! - Entity identifiers (EntityType, EntityRef, AttributeScope)
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::{Environment, ServiceConfig};
pub use domain::*;
pub use error::{IotcError, Result};
pub use service::{DependencyStatus, HealthStatus, IotcService, MicroserviceRuntime, ReadinessStatus};
