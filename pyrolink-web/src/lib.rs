//! HTTP surface for the device gateway
pub mod api;

use actix_web::{
    dev::{Server, ServerHandle},
    middleware::{Compress, Logger, NormalizePath},
    web::{self, Data},
    App, HttpServer,
};
use pyrolink_core::PyroGateway;
use pyrolink_error::{PyroError, PyroResult};
use pyrolink_models::settings::Settings;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<PyroGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<PyroGateway>) -> Self {
        Self { gateway }
    }
}

/// PyroWebServer handles the web server initialization and management
#[derive(Clone)]
pub struct PyroWebServer {
    /// Server handle for graceful shutdown
    server: Arc<Mutex<Option<ServerHandle>>>,
}

impl PyroWebServer {
    /// Create and configure the HTTP server
    fn create_server(settings: &Settings, gateway: Arc<PyroGateway>) -> PyroResult<Server> {
        let addr = format!("{}:{}", settings.web.host, settings.web.port);
        let router_prefix = settings.web.router_prefix.clone();
        let worker_count = settings.web.get_worker_count();
        let state = AppState::new(gateway);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(Arc::new(state.clone())))
                .wrap(Logger::default())
                .wrap(Compress::default())
                .wrap(NormalizePath::trim())
                // Liveness probe at the root, outside the API prefix.
                .configure(api::configure_public_routes)
                // Device-facing routes under the router prefix (default: `/api`).
                .service(web::scope(&router_prefix).configure(api::configure_routes))
        })
        .workers(worker_count)
        .bind(&addr)
        .map_err(|e| PyroError::from(format!("Failed to bind HTTP server to {addr}: {e}")))?;

        info!(addr, workers = worker_count, "web server listening");
        Ok(server.run())
    }

    /// Initialize and start the web server
    #[instrument(name = "init-web-server", skip_all)]
    pub fn init(settings: &Settings, gateway: Arc<PyroGateway>) -> PyroResult<Arc<Self>> {
        let server = Self::create_server(settings, gateway)?;
        let server_handle = server.handle();

        // Spawn server task
        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error=%e, "Web server failed");
            }
        });

        Ok(Arc::new(PyroWebServer {
            server: Arc::new(Mutex::new(Some(server_handle))),
        }))
    }

    /// Gracefully stop the web server
    #[instrument(name = "web-server-stop", skip_all)]
    pub async fn stop(&self) {
        info!("🛑 Stopping web server...");
        let mut server_guard = self.server.lock().await;
        if let Some(handle) = server_guard.take() {
            handle.stop(true).await;
        }
        info!("✅ Web server stopped");
    }
}
