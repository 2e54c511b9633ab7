use chrono::Utc;
use pyrolink_core::{canonical_message, sign, Operation, PyroGateway};
use pyrolink_models::{
    domain::prelude::{NewCommand, NewDevice, TelemetryReport},
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
use std::sync::{Arc, Once};
use tempfile::TempDir;

pub const RELAY_BOARD: &str = "100000000001";
pub const RELAY_SECRET: &str = "relay-secret-0001";
pub const UNIT_BOARD: &str = "200000000002";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

/// One fully-wired engine over a throwaway SQLite file.
pub struct TestBed {
    pub db: DatabaseConnection,
    pub directory: Arc<SqlDeviceDirectory>,
    pub commands: Arc<SqlCommandStore>,
    pub telemetry: Arc<SqlTelemetryStore>,
    pub gateway: PyroGateway,
    pub settings: Settings,
    _data_dir: TempDir,
}

pub async fn test_bed() -> TestBed {
    init_tracing();

    let data_dir = tempfile::tempdir().expect("tempdir");
    let db_path = data_dir.path().join("gateway.db");
    let db = Database::connect(format!("sqlite:{}?mode=rwc", db_path.display()))
        .await
        .expect("connect");
    Migrator::up(&db, None).await.expect("migrate");

    let directory = Arc::new(SqlDeviceDirectory::new(db.clone()));
    let commands = Arc::new(SqlCommandStore::new(db.clone()));
    let telemetry = Arc::new(SqlTelemetryStore::new(db.clone()));
    let settings = Settings::default();
    let gateway = PyroGateway::new(
        &settings,
        Arc::clone(&directory) as Arc<dyn DeviceDirectory>,
        Arc::clone(&commands) as Arc<dyn CommandStore>,
        Arc::clone(&telemetry) as Arc<dyn TelemetryStore>,
    );

    TestBed {
        db,
        directory,
        commands,
        telemetry,
        gateway,
        settings,
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
        Some(secret) => provision(bed, created, secret).await,
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

/// Provisioning happens outside the gateway protocol, so tests write the
/// secret straight to the row.
pub async fn provision(bed: &TestBed, device: DeviceModel, secret: &str) -> DeviceModel {
    let mut active = device.into_active_model();
    active.secret = Set(Some(secret.to_string()));
    active.update(&bed.db).await.expect("provision secret")
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

pub fn heartbeat_report(sender: &str, subject: Option<&str>) -> TelemetryReport {
    TelemetryReport {
        board_id: sender.to_string(),
        subject_board_id: subject.map(Into::into),
        kind: MessageKind::Heartbeat,
        token: None,
        latitude: None,
        longitude: None,
        altitude: None,
        battery_voltage: None,
        signal_strength: None,
        data: None,
    }
}

pub fn epoch_now() -> String {
    Utc::now().timestamp().to_string()
}

pub fn sign_request(
    secret: &str,
    board_id: &str,
    timestamp: &str,
    operation: Operation,
    body: Option<&[u8]>,
) -> String {
    let message = canonical_message(board_id, timestamp, operation, body);
    sign(secret, &message).expect("sign")
}
