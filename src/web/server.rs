//! Web server for File Hub.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::file::FileStorage;
use crate::store::{CollectionService, DocumentStore};
use crate::{FileHubError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Collections declared at startup.
    collections: Vec<String>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FileHubError::Config(format!("invalid server address: {e}")))?;

        let store = Arc::new(DocumentStore::new(&config.data.path));
        let files = FileStorage::new(&config.files.storage_path)?;
        tracing::info!("File storage initialized at: {}", config.files.storage_path);

        let app_state = AppState::new(CollectionService::new(store), files)
            .with_filter_fields(config.data.filter_fields.clone())
            .with_max_upload_size(config.files.max_upload_bytes());

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            collections: config.data.collections.clone(),
            cors_origins: config.cors.allowed_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Declare configured collections and build the full router.
    async fn prepare(&self) -> Result<axum::Router> {
        let created = self
            .app_state
            .collections
            .store()
            .ensure_collections(&self.collections)
            .await?;
        if !created.is_empty() {
            tracing::info!(collections = ?created, "Declared missing collections");
        }

        let router = create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
            .layer(CompressionLayer::new());

        Ok(router)
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let router = self.prepare().await?;

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.prepare().await?;

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
