use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router, middleware,
    routing::{MethodRouter, get, put},
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::file_utils::init_dirs;
use crate::latency::{Latency, latency_middleware};
use crate::routes::{bad_request, chunked_download, server_error, upload};
use crate::state::AppState;

pub struct FixtureServer {
    config: ServerConfig,
}

impl FixtureServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the dispatcher.
    ///
    /// `PUT` is accepted on every path. `GET` tries `/chunked/*` and the two
    /// fixed error routes first and falls back to static files from the
    /// uploads directory. The latency layer, when configured, wraps all of it.
    pub fn router(&self) -> Router {
        let state = AppState {
            uploads_root: Arc::new(self.config.uploads_dir.clone()),
            chunk_size: self.config.chunk_size,
        };

        let static_or_upload: MethodRouter = put(upload)
            .fallback_service(ServeDir::new(&self.config.uploads_dir))
            .with_state(state.clone());

        let mut app = Router::new()
            .route("/chunked/{*path}", get(chunked_download).put(upload))
            .route("/get/500", get(server_error).put(upload))
            .route("/get/400", get(bad_request).put(upload))
            .fallback_service(static_or_upload)
            .with_state(state);

        if let Some(delay) = self.config.latency {
            let latency = Latency::new(delay);
            info!("add latency middleware with: {}ms", latency.delay().as_millis());
            app = app.layer(middleware::from_fn_with_state(latency, latency_middleware));
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until ctrl+c.
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.listen)
            .await
            .with_context(|| format!("failed to bind {}", self.config.listen))?;

        self.serve_with_listener(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        init_dirs(&self.config.uploads_dir)
            .await
            .with_context(|| format!("failed to create {}", self.config.uploads_dir.display()))?;

        let app = self.router();

        info!("listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
