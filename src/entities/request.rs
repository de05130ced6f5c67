//! Maintenance request entity - the only record with a status lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::equipment::Equipment;
use crate::entities::team::MaintenanceTeam;
use crate::entities::timestamp;
use crate::entities::user::User;

/// Kind of maintenance work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Unscheduled repair triggered by a fault
    Corrective,
    /// Scheduled maintenance tied to a calendar date
    Preventive,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Corrective => write!(f, "CORRECTIVE"),
            RequestType::Preventive => write!(f, "PREVENTIVE"),
        }
    }
}

/// Request status as reported by the backend.
///
/// The four known states form the kanban columns. Any other string the
/// backend sends is preserved in [`RequestStatus::Unrecognized`] rather than
/// failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    New,
    InProgress,
    Repaired,
    Scrap,
    Unrecognized(String),
}

impl RequestStatus {
    /// The four known states in board order
    pub const KNOWN: [RequestStatus; 4] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::Repaired,
        RequestStatus::Scrap,
    ];

    /// Exact, case-sensitive match against the wire value
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "NEW" => RequestStatus::New,
            "IN_PROGRESS" => RequestStatus::InProgress,
            "REPAIRED" => RequestStatus::Repaired,
            "SCRAP" => RequestStatus::Scrap,
            other => RequestStatus::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::New => "NEW",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::Repaired => "REPAIRED",
            RequestStatus::Scrap => "SCRAP",
            RequestStatus::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable column label
    pub fn label(&self) -> &str {
        match self {
            RequestStatus::New => "New",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Repaired => "Repaired",
            RequestStatus::Scrap => "Scrap",
            RequestStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RequestStatus::Unrecognized(_))
    }

    /// NEW and IN_PROGRESS count as open work
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::New | RequestStatus::InProgress)
    }

    /// States reachable from this one.
    ///
    /// The client permits every move between distinct known states; legality
    /// is decided by the backend. SCRAP is conventionally terminal but is not
    /// blocked here.
    pub fn transitions(&self) -> Vec<RequestStatus> {
        Self::KNOWN
            .iter()
            .filter(|s| *s != self)
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    /// Lenient parse for user input; never yields `Unrecognized`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "new" => Ok(RequestStatus::New),
            "in_progress" | "inprogress" => Ok(RequestStatus::InProgress),
            "repaired" => Ok(RequestStatus::Repaired),
            "scrap" => Ok(RequestStatus::Scrap),
            _ => Err(format!(
                "Invalid status: {}. Use new, in-progress, repaired, or scrap",
                s
            )),
        }
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RequestStatus::from_wire(&raw))
    }
}

/// A maintenance request as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: i64,

    pub subject: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub equipment_id: i64,

    /// Team copied from the equipment's default team at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_filled_team_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_technician_id: Option<i64>,

    pub request_type: RequestType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,

    pub status: RequestStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrap_reason: Option<String>,

    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,

    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team: Option<MaintenanceTeam>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_technician: Option<User>,

    /// Server-computed; read-only on the client
    #[serde(default)]
    pub is_overdue: bool,
}

impl MaintenanceRequest {
    /// Name of the linked equipment, falling back to its id
    pub fn equipment_name(&self) -> String {
        self.equipment
            .as_ref()
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("#{}", self.equipment_id))
    }

    /// Display name of the assigned technician, if any
    pub fn technician_name(&self) -> Option<String> {
        self.assigned_technician.as_ref().map(|u| u.display_name())
    }

    pub fn team_name(&self) -> Option<&str> {
        self.maintenance_team.as_ref().map(|t| t.team_name.as_str())
    }
}

/// Payload for `POST /api/maintenance-requests`
#[derive(Debug, Clone, Serialize)]
pub struct NewRequest {
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub equipment_id: i64,

    pub request_type: RequestType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_technician_id: Option<i64>,
}

/// Partial payload for `PUT /api/maintenance-requests/{id}`; unset fields are omitted
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_technician_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrap_reason: Option<String>,
}

impl RequestUpdate {
    /// Update carrying only a new status (the kanban drop payload)
    pub fn status_only(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.description.is_none()
            && self.assigned_technician_id.is_none()
            && self.scheduled_date.is_none()
            && self.duration_hours.is_none()
            && self.status.is_none()
            && self.scrap_reason.is_none()
    }
}

/// A preventive request projected for the calendar endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: NaiveDate,
    #[serde(default)]
    pub equipment: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST_JSON: &str = r#"{
        "id": 7,
        "subject": "Hydraulic leak",
        "description": null,
        "equipment_id": 3,
        "request_type": "CORRECTIVE",
        "scheduled_date": null,
        "duration_hours": null,
        "status": "IN_PROGRESS",
        "auto_filled_team_id": 2,
        "assigned_technician_id": null,
        "scrap_reason": null,
        "created_at": "2025-01-05T09:00:00",
        "updated_at": null,
        "equipment": null,
        "maintenance_team": null,
        "assigned_technician": null,
        "is_overdue": false
    }"#;

    #[test]
    fn test_request_deserializes() {
        let req: MaintenanceRequest = serde_json::from_str(REQUEST_JSON).unwrap();
        assert_eq!(req.id, 7);
        assert_eq!(req.status, RequestStatus::InProgress);
        assert_eq!(req.request_type, RequestType::Corrective);
        assert_eq!(req.auto_filled_team_id, Some(2));
        assert_eq!(req.equipment_name(), "#3");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let json = REQUEST_JSON.replace("IN_PROGRESS", "ON_HOLD");
        let req: MaintenanceRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.status, RequestStatus::Unrecognized("ON_HOLD".to_string()));
        assert!(!req.status.is_known());
        assert_eq!(req.status.to_string(), "ON_HOLD");
    }

    #[test]
    fn test_status_wire_match_is_exact() {
        assert_eq!(
            RequestStatus::from_wire("new"),
            RequestStatus::Unrecognized("new".to_string())
        );
        assert_eq!(RequestStatus::from_wire("NEW"), RequestStatus::New);
    }

    #[test]
    fn test_status_from_str_is_lenient() {
        assert_eq!("in-progress".parse::<RequestStatus>().unwrap(), RequestStatus::InProgress);
        assert_eq!("IN_PROGRESS".parse::<RequestStatus>().unwrap(), RequestStatus::InProgress);
        assert_eq!("Scrap".parse::<RequestStatus>().unwrap(), RequestStatus::Scrap);
        assert!("on_hold".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_every_known_status_reaches_the_other_three() {
        for status in RequestStatus::KNOWN.iter() {
            let next = status.transitions();
            assert_eq!(next.len(), 3);
            assert!(!next.contains(status));
        }
        assert!(RequestStatus::Scrap.transitions().contains(&RequestStatus::New));
    }

    #[test]
    fn test_status_only_update_serializes_single_field() {
        let body = serde_json::to_value(RequestUpdate::status_only(RequestStatus::Repaired)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "REPAIRED" }));
    }

    #[test]
    fn test_new_request_omits_unset_fields() {
        let body = serde_json::to_value(NewRequest {
            subject: "Oil change".to_string(),
            description: None,
            equipment_id: 4,
            request_type: RequestType::Preventive,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            duration_hours: None,
            assigned_technician_id: None,
        })
        .unwrap();
        assert_eq!(body["request_type"], "PREVENTIVE");
        assert_eq!(body["scheduled_date"], "2025-06-01");
        assert!(body.get("description").is_none());
    }

    #[test]
    fn test_calendar_event_deserializes() {
        let json = r#"{"id": 1, "title": "Filter swap", "start": "2025-02-10",
                       "equipment": "Press 2", "status": "NEW", "is_overdue": true}"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.start, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        assert!(event.is_overdue);
    }
}
