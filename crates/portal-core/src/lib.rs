// Configuration types shared across all portal crates
pub mod config;

pub use config::{AuditConfig, ConfigError, DashboardConfig, ObservabilityConfig, PortalConfig};
