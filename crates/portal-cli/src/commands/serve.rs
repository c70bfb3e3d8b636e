//! Serve command.
//!
//! `portal serve` - Build the audit log and expose it through the dashboard API.

use portal_audit::AuditLog;
use portal_core::PortalConfig;
use portal_dashboard::DashboardServer;
use serde_json::json;
use std::sync::Arc;

pub async fn run_serve(config: PortalConfig) -> anyhow::Result<()> {
    if !config.dashboard.enabled {
        tracing::warn!("Dashboard is disabled in configuration; nothing to serve");
        return Ok(());
    }

    let audit_log = Arc::new(AuditLog::new(&config.audit)?);
    tracing::info!(
        capacity = audit_log.capacity(),
        mirror_stdout = config.audit.stdout,
        "Audit log initialised"
    );

    audit_log.log_system_event(
        "startup",
        json!({ "version": env!("CARGO_PKG_VERSION") }),
        true,
    );

    let server = DashboardServer::new(config.dashboard.clone(), Arc::clone(&audit_log));
    let result = server.run(shutdown_signal()).await;

    audit_log.log_system_event(
        "shutdown",
        json!({ "clean": result.is_ok() }),
        result.is_ok(),
    );

    result.map_err(Into::into)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
