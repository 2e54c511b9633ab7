use crate::idens;
use sea_orm::{
    sea_query::{IndexCreateStatement, TableCreateStatement, TableDropStatement},
    DatabaseBackend,
};

/// Schema contribution of one table: ordered creation, optional indexes,
/// and whether the table carries an `updated_at` column that the storage
/// layer must wire a refresh trigger for.
pub trait TableInitializer: Send + Sync {
    fn order(&self) -> i32;

    fn name(&self) -> &str;

    fn has_update_col(&self) -> bool;

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement;

    fn to_drop_table_stmt(&self, backend: DatabaseBackend) -> TableDropStatement;

    fn to_create_indexes_stmt(&self, backend: DatabaseBackend)
        -> Option<Vec<IndexCreateStatement>>;
}

pub fn initializers() -> Vec<Box<dyn TableInitializer>> {
    let mut initializers: Vec<Box<dyn TableInitializer>> = vec![
        Box::new(idens::device::Device::Table),
        Box::new(idens::command::Command::Table),
        Box::new(idens::telemetry::Telemetry::Table),
    ];

    initializers.sort_by_key(|init| init.order());
    initializers
}
