use chrono::Utc;
use pyrolink_core::{canonical_message, sign, Operation, PyroGateway};
use pyrolink_models::{
    domain::prelude::{NewCommand, NewDevice},
    entities::prelude::{CommandModel, DeviceModel},
    enums::{
        command::CommandPriority,
        device::{DeviceKind, DeviceStatus},
        message::MessageKind,
    },
    settings::Settings,
    CommandStore, DeviceDirectory, TelemetryStore,
};
use pyrolink_repository::{SqlCommandStore, SqlDeviceDirectory, SqlTelemetryStore};
use pyrolink_storage::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, IntoActiveModel, Set};
use std::sync::Arc;
use tempfile::TempDir;

pub const RELAY_BOARD: &str = "100000000001";
pub const RELAY_SECRET: &str = "relay-secret-0001";
pub const UNIT_BOARD: &str = "200000000002";

/// Engine plus store handles over a throwaway SQLite file, ready to be
/// mounted in an actix test service.
pub struct TestBed {
    pub db: DatabaseConnection,
    pub directory: Arc<SqlDeviceDirectory>,
    pub commands: Arc<SqlCommandStore>,
    pub gateway: Arc<PyroGateway>,
    _data_dir: TempDir,
}

pub async fn test_bed() -> TestBed {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let db_path = data_dir.path().join("gateway.db");
    let db = Database::connect(format!("sqlite:{}?mode=rwc", db_path.display()))
        .await
        .expect("connect");
    Migrator::up(&db, None).await.expect("migrate");

    let directory = Arc::new(SqlDeviceDirectory::new(db.clone()));
    let commands = Arc::new(SqlCommandStore::new(db.clone()));
    let telemetry = Arc::new(SqlTelemetryStore::new(db.clone()));
    let gateway = Arc::new(PyroGateway::new(
        &Settings::default(),
        Arc::clone(&directory) as Arc<dyn DeviceDirectory>,
        Arc::clone(&commands) as Arc<dyn CommandStore>,
        telemetry as Arc<dyn TelemetryStore>,
    ));

    TestBed {
        db,
        directory,
        commands,
        gateway,
        _data_dir: data_dir,
    }
}

pub async fn seed_device(
    bed: &TestBed,
    board_id: &str,
    kind: DeviceKind,
    network_id: i32,
    secret: Option<&str>,
) -> DeviceModel {
    let mut fresh = NewDevice::discovered(board_id, network_id);
    fresh.kind = kind;
    fresh.status = DeviceStatus::Offline;
    let created = bed.directory.create(fresh).await.expect("create device");
    match secret {
        Some(secret) => {
            let mut active = created.into_active_model();
            active.secret = Set(Some(secret.to_string()));
            active.update(&bed.db).await.expect("provision secret")
        }
        None => created,
    }
}

pub async fn seed_relay(bed: &TestBed, network_id: i32) -> DeviceModel {
    seed_device(
        bed,
        RELAY_BOARD,
        DeviceKind::BaseStation,
        network_id,
        Some(RELAY_SECRET),
    )
    .await
}

pub async fn seed_unit(bed: &TestBed, network_id: i32) -> DeviceModel {
    seed_device(bed, UNIT_BOARD, DeviceKind::Launcher, network_id, None).await
}

pub async fn enqueue(
    bed: &TestBed,
    target: &DeviceModel,
    kind: MessageKind,
    priority: CommandPriority,
) -> CommandModel {
    bed.commands
        .create(NewCommand {
            priority,
            ..NewCommand::new(target.id, target.network_id, kind)
        })
        .await
        .expect("enqueue command")
}

/// Timestamp and signature headers for a request exactly as a device
/// would compute them.
pub fn auth_headers(
    secret: &str,
    board_id: &str,
    operation: Operation,
    body: Option<&[u8]>,
) -> (String, String) {
    let timestamp = Utc::now().timestamp().to_string();
    let message = canonical_message(board_id, &timestamp, operation, body);
    let signature = sign(secret, &message).expect("sign");
    (timestamp, signature)
}
