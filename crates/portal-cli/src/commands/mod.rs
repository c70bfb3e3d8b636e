//! CLI command implementations.

pub mod serve;
pub mod smoke;

use anyhow::Context;
use portal_core::PortalConfig;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "portal.yaml";

/// Load configuration from an explicit path, `./portal.yaml`, or defaults.
///
/// An explicit path must exist; the implicit `./portal.yaml` is optional.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PortalConfig> {
    match path {
        Some(path) => PortalConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                PortalConfig::from_file(default_path)
                    .with_context(|| format!("failed to load config from {}", DEFAULT_CONFIG_FILE))
            } else {
                Ok(PortalConfig::default())
            }
        }
    }
}
