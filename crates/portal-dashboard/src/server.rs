//! Dashboard server implementation.

use portal_audit::AuditLog;
use portal_core::DashboardConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;

/// The dashboard server.
pub struct DashboardServer {
    config: DashboardConfig,
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server over the given audit log.
    pub fn new(config: DashboardConfig, audit_log: Arc<AuditLog>) -> Self {
        Self {
            config,
            state: AppState::new(audit_log),
        }
    }

    /// Start the dashboard server and serve until the future is dropped or
    /// `shutdown` resolves.
    pub async fn run(
        &self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), DashboardError> {
        let addr = self.config.listen_addr();
        tracing::info!(address = %addr, "Starting audit dashboard");

        let app = routes::create_router(self.state.clone()).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(format!("failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("Audit dashboard stopped");
        Ok(())
    }

    /// Get the configured listen address.
    pub fn listen_addr(&self) -> String {
        self.config.listen_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let log = Arc::new(AuditLog::with_capacity(10).unwrap());
        let server = DashboardServer::new(DashboardConfig::default(), log);
        assert_eq!(server.listen_addr(), "127.0.0.1:8088");
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = DashboardConfig {
            port,
            ..Default::default()
        };
        let log = Arc::new(AuditLog::with_capacity(10).unwrap());
        let server = DashboardServer::new(config, log);

        let result = server.run(std::future::pending()).await;
        assert!(matches!(result, Err(DashboardError::StartupFailed(_))));
    }
}
