pub mod command;
pub mod device;
pub mod telemetry;

pub use command::SqlCommandStore;
pub use device::SqlDeviceDirectory;
pub use telemetry::SqlTelemetryStore;
