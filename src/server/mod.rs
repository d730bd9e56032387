//! HTTP surface: `GET /` serves the page, `GET /list` returns a directory listing.

mod assets;
mod error;
mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::core::config::ServerConfig;
use crate::core::errors::Result;
use crate::services::fs::{FileSystem, LocalFs};

pub use error::ApiError;
pub use routes::{index, list_directory, ListQuery};

/// Shared per-request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub fs: Arc<dyn FileSystem>,
}

pub struct Server {
    state: AppState,
}

impl Server {
    /// A server over the real disk.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_filesystem(config, Arc::new(LocalFs))
    }

    pub fn with_filesystem(config: ServerConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            state: AppState {
                config: Arc::new(config),
                fs,
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(routes::index))
            .route("/list", get(routes::list_directory))
            .with_state(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let listener = TcpListener::bind(self.state.config.addr).await?;
        self.serve(listener, shutdown).await
    }

    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            default_path = %self.state.config.default_path.display(),
            "listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}
