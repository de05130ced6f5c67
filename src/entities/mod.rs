//! Wire types for the GearGuard backend
//!
//! Every resource the backend serves has a concrete type here, including the
//! nested objects embedded in responses (a request carries its equipment,
//! team and technician; equipment carries its team and default technician).
//!
//! - [`MaintenanceRequest`] - Corrective and preventive work orders with a status lifecycle
//! - [`Equipment`] - Tracked assets with their default team and technician
//! - [`MaintenanceTeam`] - Technician groupings with per-team display names
//! - [`User`] - Accounts with a role
//! - [`Report`] - Aggregated request counts

pub mod equipment;
pub mod report;
pub mod request;
pub mod team;
pub mod user;

pub use equipment::{Equipment, EquipmentInput, EquipmentList, EquipmentStatus};
pub use report::{PreventiveVsCorrective, Report};
pub use request::{
    CalendarEvent, MaintenanceRequest, NewRequest, RequestStatus, RequestType, RequestUpdate,
};
pub use team::{MaintenanceTeam, MemberAdd, MemberUpdate, TeamInput, TeamMember};
pub use user::{LoginRequest, RegisterRequest, Token, User, UserRole, UserUpdate};

/// Timestamp decoding tolerant of the backend's two shapes.
///
/// Timezone-aware columns arrive as RFC 3339; rows written by SQLite-backed
/// deployments come back naive and are taken as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_parse_rfc3339() {
            let dt = parse("2025-03-01T08:30:00+02:00").unwrap();
            assert_eq!(dt.hour(), 6);
        }

        #[test]
        fn test_parse_naive_as_utc() {
            let dt = parse("2025-03-01T08:30:00.123456").unwrap();
            assert_eq!(dt.day(), 1);
            assert_eq!(dt.hour(), 8);

            let spaced = parse("2025-03-01 08:30:00").unwrap();
            assert_eq!(spaced.minute(), 30);
        }

        #[test]
        fn test_parse_garbage() {
            assert!(parse("yesterday").is_none());
        }
    }
}
