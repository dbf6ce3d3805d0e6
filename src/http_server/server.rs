//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::DatasetApi;
use crate::observability::{Event, LogControl};

use super::config::HttpServerConfig;
use super::dataset_routes::dataset_routes;
use super::observability_routes::observability_routes;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub api: Arc<DatasetApi>,
    pub log: LogControl,
    /// Queries still running after this long are cancelled
    pub query_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(api: DatasetApi, log: LogControl) -> Self {
        Self {
            api: Arc::new(api),
            log,
            query_timeout: None,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Apply a request's `log_lvl`; unknown levels are logged and ignored
    pub(crate) fn apply_log_level(&self, level: Option<&str>) {
        let Some(level) = level else {
            return;
        };
        if let Err(e) = self.log.set_level(level) {
            warn!(code = e.code(), error = %e, "ignoring log_lvl");
        }
    }
}

/// HTTP Server for the sales dataset
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        let origins = if config.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            AllowOrigin::list(origins)
        };

        let cors = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any);

        Router::new()
            .merge(observability_routes(state.clone()))
            .merge(dataset_routes(state))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and run until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(
            event = Event::ServerListening.as_str(),
            addr = %listener.local_addr()?,
            "http server listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(event = Event::ShutdownStart.as_str(), "shutting down");
}
