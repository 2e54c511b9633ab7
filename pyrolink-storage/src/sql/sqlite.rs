use pyrolink_error::{storage::StorageError, StorageResult};
use pyrolink_models::settings::{PyroDbConfig, Sqlite};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::{info, instrument, log::LevelFilter};

#[instrument(name = "init_sqlite_db", skip_all)]
/// Open the SQLite pool. With auto_create enabled the data directory and
/// the database file both appear on first run; mode=rwc in the URL covers
/// the file, but SQLite never creates directories.
pub async fn init_db(config: &Sqlite) -> StorageResult<DatabaseConnection> {
    if config.auto_create {
        std::fs::create_dir_all(config.db_dir()).map_err(|e| {
            StorageError::DBError(DbErr::Custom(format!(
                "cannot create data directory {}: {e}",
                config.db_dir()
            )))
        })?;
    }

    let database_url = config.to_url();

    let mut opts = ConnectOptions::new(&database_url);
    opts.connect_timeout(Duration::from_millis(config.timeout))
        .idle_timeout(Duration::from_millis(config.idle_timeout))
        .max_lifetime(Duration::from_millis(config.max_lifetime))
        .max_connections(config.max_connections);

    #[cfg(debug_assertions)]
    {
        opts.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Info);
    }
    #[cfg(not(debug_assertions))]
    {
        opts.sqlx_logging(false)
            .sqlx_logging_level(LevelFilter::Off);
    }

    info!(
        "Connecting to SQLite database at: {} (auto_create: {})",
        config.db_path(),
        config.auto_create
    );

    let db = Database::connect(opts).await?;

    // Performance PRAGMAs for release builds, without WAL so the data
    // directory stays safe on NFS and other network filesystems.
    #[cfg(not(debug_assertions))]
    {
        use sea_orm::{ConnectionTrait, DbBackend, Statement};
        for pragma in [
            "PRAGMA synchronous=NORMAL;",
            "PRAGMA temp_store=MEMORY;",
            "PRAGMA cache_size=-20000;",
        ] {
            let _ = db
                .execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string()))
                .await;
        }
    }
    info!("Successfully connected to SQLite database");

    Ok(db)
}
