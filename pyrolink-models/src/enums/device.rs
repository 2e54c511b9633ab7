use sea_orm::{DeriveActiveEnum, EnumIter};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{Display, Error, Formatter};

/// Physical device kind.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize_repr, Deserialize_repr,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[repr(i16)]
pub enum DeviceKind {
    /// IP-connected base station bridging the radio link.
    BaseStation = 0,
    /// Field launch unit, reachable only through a base station.
    Launcher = 1,
}

impl DeviceKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseStation => "base-station",
            Self::Launcher => "launcher",
        }
    }
}

impl Display for DeviceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Device lifecycle status. `Discovered` marks units first seen through a
/// forwarded telemetry report and not yet confirmed by an operator.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize_repr, Deserialize_repr,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[repr(i16)]
pub enum DeviceStatus {
    Online = 0,
    Offline = 1,
    Discovered = 2,
    LowBattery = 3,
}

impl DeviceStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Discovered => "discovered",
            Self::LowBattery => "low-battery",
        }
    }
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}
