#[allow(clippy::needless_update)]
mod command;
#[allow(clippy::needless_update)]
mod device;
#[allow(clippy::needless_update)]
mod gateway;
pub mod prelude;
#[allow(clippy::needless_update)]
mod telemetry;
