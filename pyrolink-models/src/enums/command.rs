use sea_orm::{DeriveActiveEnum, EnumIter};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{Display, Error, Formatter};

/// Dispatch urgency. Numeric order is the ranking, so a descending sort on
/// the stored value yields critical-first selection.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize_repr,
    Deserialize_repr,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[repr(i16)]
pub enum CommandPriority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl CommandPriority {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Display for CommandPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Command lifecycle state. Transitions are one-directional: once a command
/// reaches a terminal state it is history and never resurrected.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize_repr, Deserialize_repr,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[repr(i16)]
pub enum CommandStatus {
    Pending = 0,
    Processing = 1,
    Completed = 2,
    Failed = 3,
    TimedOut = 4,
}

impl CommandStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timed-out",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }

    /// Legal lifecycle edges. Acknowledgments are tolerated straight from
    /// `Pending` (a relay may deliver and confirm within one radio window);
    /// `Processing -> Pending` is the sweeper requeueing a stale dispatch.
    pub fn can_transition_to(&self, next: CommandStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Processing) => true,
            (Self::Pending | Self::Processing, Self::Completed | Self::Failed) => true,
            (Self::Processing, Self::Pending) => true,
            (Self::Processing, Self::TimedOut) => true,
            _ => false,
        }
    }
}

impl Display for CommandStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranking() {
        assert!(CommandPriority::Critical > CommandPriority::High);
        assert!(CommandPriority::High > CommandPriority::Normal);
        assert!(CommandPriority::Normal > CommandPriority::Low);
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for terminal in [
            CommandStatus::Completed,
            CommandStatus::Failed,
            CommandStatus::TimedOut,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                CommandStatus::Pending,
                CommandStatus::Processing,
                CommandStatus::Completed,
                CommandStatus::Failed,
                CommandStatus::TimedOut,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_live_transitions() {
        assert!(CommandStatus::Pending.can_transition_to(CommandStatus::Processing));
        assert!(CommandStatus::Pending.can_transition_to(CommandStatus::Completed));
        assert!(CommandStatus::Pending.can_transition_to(CommandStatus::Failed));
        assert!(CommandStatus::Processing.can_transition_to(CommandStatus::Completed));
        assert!(CommandStatus::Processing.can_transition_to(CommandStatus::Failed));
        assert!(CommandStatus::Processing.can_transition_to(CommandStatus::Pending));
        assert!(CommandStatus::Processing.can_transition_to(CommandStatus::TimedOut));
        assert!(!CommandStatus::Pending.can_transition_to(CommandStatus::TimedOut));
        assert!(!CommandStatus::Pending.can_transition_to(CommandStatus::Pending));
    }
}
