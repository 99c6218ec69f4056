//! API server implementation
//!
//! Serves the read and control API over the tracker registry.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::coordinator::{RefreshDispatcher, TrackerRegistry};

use super::routes::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tracked coordinators
    pub registry: Arc<TrackerRegistry>,

    /// Forced refresh entry point
    pub dispatcher: RefreshDispatcher,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(registry: Arc<TrackerRegistry>) -> Self {
        Self {
            dispatcher: RefreshDispatcher::new(registry.clone()),
            registry,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// API Server
// ============================================================================

/// HTTP API server
pub struct ApiServer {
    bind_address: SocketAddr,
    enable_cors: bool,
    enable_request_logging: bool,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: &ServerConfig, registry: Arc<TrackerRegistry>) -> Result<Self, ServerError> {
        let bind_address = config
            .socket_addr()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        Ok(Self {
            bind_address,
            enable_cors: config.enable_cors,
            enable_request_logging: config.enable_request_logging,
            state: AppState::new(registry),
        })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        tracing::info!("Starting API server on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("API server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Configuration error
    ConfigError(String),

    /// Failed to bind to address
    BindError(String),

    /// Server error
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tests
// ============================================================================
