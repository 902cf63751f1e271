//! Tracing Configuration

/// Log subscriber configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "console-api".to_string(),
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl TracingConfig {
    pub fn new(service_name: &str, log_level: &str, json_logs: bool) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: log_level.to_string(),
            json_logs,
        }
    }
}
