use pyrolink_error::{PyroError, PyroResult};
use pyrolink_models::settings::Log;
use tracing::subscriber::set_global_default;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Process-wide tracing setup.
///
/// Holds the file writer guard; dropping it stops the background flush
/// thread, so `main` keeps the instance alive for the life of the process.
pub struct Logger {
    _file_guard: WorkerGuard,
}

impl Logger {
    /// Initializes the logger
    ///
    /// Logs go to both the console and a daily rolling file. `RUST_LOG`
    /// overrides the configured level when set.
    pub fn initialize(settings: &Log) -> PyroResult<Self> {
        // Create a daily rolling file appender for log files
        let file_appender = rolling::daily(&settings.dir, "pyrolink.log");
        // Convert the file appender into a non-blocking writer
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

        // Console layer: pretty with source locations in debug builds,
        // compact in release builds
        let console_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stdout)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_file(false)
                .with_line_number(false);

            layer
        };

        // File layer never carries ANSI escapes
        let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

        let subscriber = Registry::default()
            .with(filter)
            .with(console_layer)
            .with(file_layer);

        set_global_default(subscriber).map_err(|_| PyroError::from("Failed to set logger"))?;

        Ok(Logger {
            _file_guard: file_guard,
        })
    }
}
