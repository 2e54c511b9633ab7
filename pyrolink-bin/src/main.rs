mod logger;

use clap::Parser;
use pyrolink_core::{CommandSweeper, PyroGateway};
use pyrolink_error::{PyroError, PyroResult};
use pyrolink_models::{
    constants::DEFAULT_CONFIG_FILE_NAME, settings::Settings, CommandStore, DeviceDirectory,
    TelemetryStore,
};
use pyrolink_repository::{SqlCommandStore, SqlDeviceDirectory, SqlTelemetryStore};
use pyrolink_web::PyroWebServer;
use std::{env::current_dir, path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// PyroLink - field launch unit gateway
///
/// Authenticates base-station relays over signed HTTP, hands them queued
/// commands for the launch units behind them and ingests the telemetry
/// they forward back.
#[derive(Parser)]
#[command(name = "pyrolink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "PyroLink Gateway", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, the gateway will look for 'pyrolink.toml'
    /// in the current working directory.
    #[arg(short, long, env = "PYRO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> PyroResult<()> {
    let cli = Cli::parse();

    // Determine the configuration file path
    // If not provided via CLI or environment variable, use default path
    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| PyroError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };

    let settings = Settings::new(config_path.to_string_lossy().to_string())?;
    let _logger = logger::Logger::initialize(&settings.log)?;

    let db = pyrolink_storage::init(&settings).await?;

    let directory: Arc<dyn DeviceDirectory> = Arc::new(SqlDeviceDirectory::new(db.clone()));
    let commands: Arc<dyn CommandStore> = Arc::new(SqlCommandStore::new(db.clone()));
    let telemetry: Arc<dyn TelemetryStore> = Arc::new(SqlTelemetryStore::new(db.clone()));

    let gateway = Arc::new(PyroGateway::new(
        &settings,
        directory,
        Arc::clone(&commands),
        telemetry,
    ));

    let shutdown = CancellationToken::new();
    if settings.sweeper.enabled {
        let sweeper = CommandSweeper::new(commands, &settings.sweeper);
        tokio::spawn(sweeper.run(shutdown.clone()));
    }

    let server = PyroWebServer::init(&settings, gateway)?;
    info!(version = env!("CARGO_PKG_VERSION"), "PyroLink gateway is up");

    listen_for_shutdown().await;

    // Shutdown components in reverse order of initialization
    info!("🛑 Starting graceful shutdown...");
    shutdown.cancel();
    server.stop().await;
    db.close().await?;
    info!("✅ Graceful shutdown completed successfully");
    Ok(())
}

async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
        let mut sigquit = signal(SignalKind::quit()).expect("failed to register SIGQUIT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal");
            }
            _ = sigquit.recv() => {
                info!("Received SIGQUIT signal");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received ctrl-c signal");
        }
    }
}
