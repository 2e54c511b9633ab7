use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Error, Formatter};

/// Wire-level message kind. Command kinds travel base-station-bound,
/// report kinds travel unit-originated; the gateway stores both in the
/// same telemetry ledger.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(32))",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    // Gateway -> unit commands.
    Arm,
    Disarm,
    Fire,
    StatusRequest,
    ConfigUpdate,
    Ping,
    // Unit -> gateway reports.
    StatusReport,
    PositionReport,
    FireReport,
    Heartbeat,
    Event,
}

impl MessageKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "ARM",
            Self::Disarm => "DISARM",
            Self::Fire => "FIRE",
            Self::StatusRequest => "STATUS_REQUEST",
            Self::ConfigUpdate => "CONFIG_UPDATE",
            Self::Ping => "PING",
            Self::StatusReport => "STATUS_REPORT",
            Self::PositionReport => "POSITION_REPORT",
            Self::FireReport => "FIRE_REPORT",
            Self::Heartbeat => "HEARTBEAT",
            Self::Event => "EVENT",
        }
    }

    /// Kinds a field unit is allowed to submit as telemetry.
    #[inline]
    pub fn is_report(&self) -> bool {
        matches!(
            self,
            Self::StatusReport
                | Self::PositionReport
                | Self::FireReport
                | Self::Heartbeat
                | Self::Event
        )
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}
