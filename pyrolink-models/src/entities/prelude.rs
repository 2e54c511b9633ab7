pub use super::command::{
    ActiveModel as CommandActiveModel, Column as CommandColumn, Entity as CommandEntity,
    Model as CommandModel,
};
pub use super::device::{
    ActiveModel as DeviceActiveModel, Column as DeviceColumn, Entity as DeviceEntity,
    Model as DeviceModel,
};
pub use super::telemetry::{
    ActiveModel as TelemetryActiveModel, Column as TelemetryColumn, Entity as TelemetryEntity,
    Model as TelemetryModel,
};
