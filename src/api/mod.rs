//! HTTP read and control API
//!
//! ```text
//! GET  /api/health
//! GET  /api/countries
//! GET  /api/medals
//! GET  /api/medals/{code}
//! GET  /api/medals/{code}/sensors
//! GET  /api/medals/{code}/status
//! POST /api/refresh            {"country": "NOR" | "all"}
//! GET  /metrics
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use medalwatch::api::ApiServer;
//!
//! let server = ApiServer::new(&config.server, registry)?;
//! server.start_with_shutdown(shutdown_signal()).await?;
//! ```

pub mod routes;
pub mod server;

pub use routes::{create_router, ApiResponse, ErrorResponse};
pub use server::{ApiServer, AppState, ServerError};
