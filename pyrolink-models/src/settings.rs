use config::{Config, File};
use pyrolink_error::PyroResult;
use serde::{self, Deserialize};
use std::{ops::Deref, sync::Arc};
use sysinfo::System;

use crate::constants::DATA_DIR;

#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    pub fn new(config_path: String) -> PyroResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path.as_str()).required(false))
            .add_source(
                config::Environment::with_prefix("PYRO")
                    .separator("__")
                    .try_parsing(true),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self(Arc::new(Inner::default()))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Inner {
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub db: Db,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub battery: Battery,
    #[serde(default)]
    pub sweeper: Sweeper,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    #[serde(default = "Web::router_prefix_default")]
    pub router_prefix: String,
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    #[serde(default = "Web::workers_default")]
    pub workers: i32,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            router_prefix: Web::router_prefix_default(),
            host: Web::host_default(),
            port: Web::port_default(),
            workers: Web::workers_default(),
        }
    }
}

impl Web {
    fn router_prefix_default() -> String {
        "/api".into()
    }

    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn port_default() -> u16 {
        6170
    }

    fn workers_default() -> i32 {
        0 // 0 = one worker per CPU
    }

    /// Get actual number of workers based on configuration
    pub fn get_worker_count(&self) -> usize {
        match self.workers {
            0 => System::new_all().cpus().len(),
            n if n > 0 => n as usize,
            n => std::cmp::max(
                1,
                (System::new_all().cpus().len() as i32 / n.abs()) as usize,
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Db {
    #[serde(default)]
    pub sqlite: Sqlite,
}

/// SQLite database type enum
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    #[default]
    Sqlite,
}

/// Methods a storage backend needs from its configuration section.
pub trait PyroDbConfig: Send + Sync {
    /// Returns the type of SQL database.
    fn db_type(&self) -> SqlType;

    /// Returns the database file path.
    fn db_path(&self) -> String;

    /// Generates a URL for the database connection.
    fn to_url(&self) -> String;

    /// Returns the directory containing the database file.
    fn db_dir(&self) -> String;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
    #[serde(default = "Sqlite::path_default")]
    pub path: String,
    #[serde(default = "Sqlite::timeout_default")]
    pub timeout: u64,
    #[serde(default = "Sqlite::idle_timeout_default")]
    pub idle_timeout: u64,
    #[serde(default = "Sqlite::max_lifetime_default")]
    pub max_lifetime: u64,
    #[serde(default = "Sqlite::max_connections_default")]
    pub max_connections: u32,
    #[serde(default = "Sqlite::auto_create_default")]
    pub auto_create: bool,
}

impl Default for Sqlite {
    fn default() -> Self {
        Sqlite {
            path: Sqlite::path_default(),
            timeout: Sqlite::timeout_default(),
            idle_timeout: Sqlite::idle_timeout_default(),
            max_lifetime: Sqlite::max_lifetime_default(),
            max_connections: Sqlite::max_connections_default(),
            auto_create: Sqlite::auto_create_default(),
        }
    }
}

impl PyroDbConfig for Sqlite {
    fn db_type(&self) -> SqlType {
        SqlType::Sqlite
    }

    fn db_path(&self) -> String {
        self.path.clone()
    }

    fn to_url(&self) -> String {
        if self.auto_create {
            // mode=rwc creates the file on first open
            format!("sqlite:{}/{}?mode=rwc", DATA_DIR, self.path)
        } else {
            format!("sqlite:{}/{}", DATA_DIR, self.path)
        }
    }

    fn db_dir(&self) -> String {
        DATA_DIR.into()
    }
}

impl Sqlite {
    fn path_default() -> String {
        "pyrolink.db".into()
    }

    fn timeout_default() -> u64 {
        5000
    }

    fn idle_timeout_default() -> u64 {
        5000
    }

    fn max_lifetime_default() -> u64 {
        5000
    }

    fn max_connections_default() -> u32 {
        100
    }

    fn auto_create_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    #[serde(default = "Log::level_default")]
    pub level: String,
    #[serde(default = "Log::dir_default")]
    pub dir: String,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Log::level_default(),
            dir: Log::dir_default(),
        }
    }
}

impl Log {
    fn level_default() -> String {
        "info".into()
    }

    fn dir_default() -> String {
        "logs".into()
    }
}

/// Replay-protection bounds for the authentication gate. Policy constants,
/// not structural invariants.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Protocol {
    /// Oldest acceptable message age in seconds
    #[serde(default = "Protocol::max_age_secs_default")]
    pub max_age_secs: i64,
    /// Tolerated device clock lead in seconds
    #[serde(default = "Protocol::max_skew_secs_default")]
    pub max_skew_secs: i64,
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol {
            max_age_secs: Protocol::max_age_secs_default(),
            max_skew_secs: Protocol::max_skew_secs_default(),
        }
    }
}

impl Protocol {
    fn max_age_secs_default() -> i64 {
        300
    }

    fn max_skew_secs_default() -> i64 {
        60
    }
}

/// Voltage-to-percentage mapping for battery-derived device status.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Battery {
    /// Voltage reading mapped to 0%
    #[serde(default = "Battery::min_volts_default")]
    pub min_volts: f64,
    /// Voltage reading mapped to 100%
    #[serde(default = "Battery::max_volts_default")]
    pub max_volts: f64,
    /// Below this percentage a device is marked low-battery
    #[serde(default = "Battery::low_threshold_percent_default")]
    pub low_threshold_percent: f64,
}

impl Default for Battery {
    fn default() -> Self {
        Battery {
            min_volts: Battery::min_volts_default(),
            max_volts: Battery::max_volts_default(),
            low_threshold_percent: Battery::low_threshold_percent_default(),
        }
    }
}

impl Battery {
    fn min_volts_default() -> f64 {
        3.3
    }

    fn max_volts_default() -> f64 {
        4.2
    }

    fn low_threshold_percent_default() -> f64 {
        20.0
    }
}

/// Periodic reconciliation of commands stuck in processing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sweeper {
    #[serde(default = "Sweeper::enabled_default")]
    pub enabled: bool,
    /// Sweep interval in seconds
    #[serde(default = "Sweeper::interval_secs_default")]
    pub interval_secs: u64,
    /// Age after which an unacknowledged dispatch is considered stale
    #[serde(default = "Sweeper::processing_timeout_secs_default")]
    pub processing_timeout_secs: i64,
}

impl Default for Sweeper {
    fn default() -> Self {
        Sweeper {
            enabled: Sweeper::enabled_default(),
            interval_secs: Sweeper::interval_secs_default(),
            processing_timeout_secs: Sweeper::processing_timeout_secs_default(),
        }
    }
}

impl Sweeper {
    fn enabled_default() -> bool {
        true
    }

    fn interval_secs_default() -> u64 {
        30
    }

    fn processing_timeout_secs_default() -> i64 {
        120
    }
}
