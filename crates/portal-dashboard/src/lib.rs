//! # portal-dashboard
//!
//! Read-only JSON API over the portal's audit log, for compliance and
//! analytics dashboards.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /health` | Liveness and retention figures |
//! | `GET /api/audit` | Filtered, paginated entries (newest first) |
//! | `GET /api/audit/{id}` | One entry, 404 once evicted |
//! | `GET /api/audit/stats/logins?timeframe=hour\|day\|week` | Login attempt counts |
//! | `GET /api/audit/stats/requests` | Document request counts |
//!
//! There are no write routes; entries are only created by application code.

pub mod api_types;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::AppState;
