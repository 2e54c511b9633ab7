mod migration;
mod sql;

use pyrolink_error::{storage::StorageError, PyroResult};
use pyrolink_models::settings::Settings;
use sea_orm::DatabaseConnection;
use sql::sqlite;
use tracing::{info, instrument};

pub use migration::Migrator;
pub use sea_orm_migration::MigratorTrait;

/// Opens the database pool and brings the schema up to date.
#[instrument(name = "init-storage", skip_all)]
pub async fn init(settings: &Settings) -> PyroResult<DatabaseConnection, StorageError> {
    let db = sqlite::init_db(&settings.db.sqlite).await?;

    Migrator::up(&db, None).await?;

    info!("Storage initialized");
    Ok(db)
}
