//! Configuration types for the document-request portal.
//!
//! A single YAML file (conventionally `portal.yaml`) is loaded into
//! [`PortalConfig`]. Every section is optional and falls back to its defaults.
//!
//! ```yaml
//! audit:
//!   capacity: 1000
//!   stdout: false
//! dashboard:
//!   host: 127.0.0.1
//!   port: 8088
//! observability:
//!   log_filter: info
//! ```

pub mod audit;
pub mod dashboard;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::AuditConfig;
pub use dashboard::DashboardConfig;

/// Complete portal configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Audit log configuration.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Dashboard configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PortalConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audit.capacity == 0 {
            return Err(ConfigError::Config(
                "audit.capacity must be greater than zero".to_string(),
            ));
        }
        if self.dashboard.enabled && self.dashboard.port == 0 {
            return Err(ConfigError::Config(
                "dashboard.port must be set when the dashboard is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = PortalConfig::from_yaml("{}").unwrap();
        assert_eq!(config.audit.capacity, audit::DEFAULT_CAPACITY);
        assert!(!config.audit.stdout);
        assert!(config.dashboard.enabled);
        assert_eq!(config.dashboard.listen_addr(), "127.0.0.1:8088");
        assert_eq!(config.observability.log_filter, "info");
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
audit:
  capacity: 50
dashboard:
  port: 9000
"#;
        let config = PortalConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.audit.capacity, 50);
        assert!(!config.audit.stdout);
        assert_eq!(config.dashboard.port, 9000);
        assert_eq!(config.dashboard.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PortalConfig::from_yaml("audit:\n  capacity: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_zero_port_allowed_when_disabled() {
        let yaml = "dashboard:\n  enabled: false\n  port: 0\n";
        assert!(PortalConfig::from_yaml(yaml).is_ok());

        let yaml = "dashboard:\n  port: 0\n";
        assert!(PortalConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = PortalConfig::from_yaml("audit: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "audit:\n  capacity: 10\n  stdout: true").unwrap();

        let config = PortalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.audit.capacity, 10);
        assert!(config.audit.stdout);
    }

    #[test]
    fn test_missing_file() {
        let err = PortalConfig::from_file("/nonexistent/portal.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
