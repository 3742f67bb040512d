//! HTTP server assembly.
//!
//! One router serves three surfaces: the REST API under `/v1`, the HTML
//! portal at `/` and `/collections/...`, and the form endpoints under
//! `/web`. All of them are thin callers into the same [`CollectionStore`].

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::observability::Logger;
use crate::store::CollectionStore;

use super::api_routes::api_routes;
use super::web_routes::web_routes;

/// State shared by every handler.
pub struct AppState {
    pub store: CollectionStore,
    pub config: Config,
}

/// HTTP server for the REST API and web portal.
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// Build the server over a store root.
    ///
    /// The server-side store serializes per-collection mutations, since
    /// concurrent requests against one collection are expected here.
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        let addr = config.socket_addr();
        let state = Arc::new(AppState {
            store: CollectionStore::with_locking(root),
            config,
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = Router::new()
            .nest("/v1", api_routes(state.clone()))
            .merge(web_routes(state))
            .layer(cors);

        Self { addr, router }
    }

    /// Bind address the server will listen on.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The assembled router, for in-process testing.
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.addr).await?;
        Logger::info("server_started", &[("addr", &self.addr)]);
        axum::serve(listener, self.router).await
    }
}
