use chrono::{DateTime, Utc};
use pyrolink_error::auth::AuthError;
use pyrolink_models::settings::Protocol;

/// Acceptance window for message timestamps.
///
/// A message is admitted iff `-max_skew <= now - message_time <= max_age`;
/// anything older is treated as a capture replay, anything further ahead as
/// a bad device clock. Bounds are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct ReplayWindow {
    max_age_secs: i64,
    max_skew_secs: i64,
}

impl ReplayWindow {
    pub fn new(protocol: &Protocol) -> Self {
        Self {
            max_age_secs: protocol.max_age_secs,
            max_skew_secs: protocol.max_skew_secs,
        }
    }

    /// Parses a wire timestamp and checks it against the window.
    pub fn check(&self, raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
        let message_time = parse_timestamp(raw).ok_or(AuthError::InvalidTimestamp)?;
        let age = now.signed_duration_since(message_time).num_seconds();
        if age > self.max_age_secs || age < -self.max_skew_secs {
            return Err(AuthError::StaleTimestamp);
        }
        Ok(message_time)
    }
}

/// Integer seconds since the epoch, or an RFC 3339 date-time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(epoch) = raw.parse::<i64>() {
        return DateTime::from_timestamp(epoch, 0);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_EPOCH: i64 = 1_700_000_000;

    fn window() -> ReplayWindow {
        ReplayWindow::new(&Protocol::default())
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW_EPOCH, 0).unwrap()
    }

    fn check_offset(age_secs: i64) -> Result<DateTime<Utc>, AuthError> {
        window().check(&(NOW_EPOCH - age_secs).to_string(), now())
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        assert!(check_offset(300).is_ok());
        assert!(check_offset(-60).is_ok());
        assert!(matches!(check_offset(301), Err(AuthError::StaleTimestamp)));
        assert!(matches!(check_offset(-61), Err(AuthError::StaleTimestamp)));
    }

    #[test]
    fn test_interior_of_window() {
        assert!(check_offset(0).is_ok());
        assert!(check_offset(299).is_ok());
        assert!(check_offset(-59).is_ok());
    }

    #[test]
    fn test_rfc3339_form_accepted() {
        let result = window().check("2023-11-14T22:13:20Z", now());
        assert_eq!(result.unwrap(), now());

        // Offset forms normalize to the same instant.
        let result = window().check("2023-11-14T23:13:20+01:00", now());
        assert_eq!(result.unwrap(), now());
    }

    #[test]
    fn test_unparsable_rejected() {
        for raw in ["", "yesterday", "170.5", "1700000000s", "2023-11-14"] {
            assert!(matches!(
                window().check(raw, now()),
                Err(AuthError::InvalidTimestamp)
            ));
        }
    }
}
