pub use crate::domain::{
    command::{correlation_token, CommandDescriptor, NewCommand, DEFAULT_MAX_RETRIES},
    device::{DevicePatch, NewDevice},
    gateway::{AckAccepted, AckRequest, PollQuery, TelemetryAccepted},
    telemetry::{NewTelemetry, TelemetryReport},
};
