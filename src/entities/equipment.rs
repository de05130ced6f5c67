//! Equipment entity - tracked assets

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::entities::team::MaintenanceTeam;
use crate::entities::timestamp;
use crate::entities::user::User;

/// Equipment lifecycle state; a SCRAP request flips equipment to SCRAPPED server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Scrapped,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatus::Active => write!(f, "ACTIVE"),
            EquipmentStatus::Scrapped => write!(f, "SCRAPPED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_expiry: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_technician_id: Option<i64>,

    #[serde(default)]
    pub status: EquipmentStatus,

    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team: Option<MaintenanceTeam>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_technician: Option<User>,

    /// NEW + IN_PROGRESS requests against this equipment
    #[serde(default)]
    pub open_requests_count: u32,
}

/// Page returned by `GET /api/equipment`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentList {
    pub items: Vec<Equipment>,
    pub total: u64,
}

impl EquipmentList {
    pub fn active_count(&self) -> usize {
        self.items
            .iter()
            .filter(|e| e.status == EquipmentStatus::Active)
            .count()
    }
}

/// Full equipment body for create and update (the backend replaces every field on PUT)
#[derive(Debug, Clone, Default, Serialize)]
pub struct EquipmentInput {
    pub name: String,
    pub serial_number: Option<String>,
    pub department: Option<String>,
    pub assigned_employee_id: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub location: Option<String>,
    pub maintenance_team_id: Option<i64>,
    pub default_technician_id: Option<i64>,
    pub status: EquipmentStatus,
}

impl From<&Equipment> for EquipmentInput {
    fn from(e: &Equipment) -> Self {
        Self {
            name: e.name.clone(),
            serial_number: e.serial_number.clone(),
            department: e.department.clone(),
            assigned_employee_id: e.assigned_employee_id,
            purchase_date: e.purchase_date,
            warranty_expiry: e.warranty_expiry,
            location: e.location.clone(),
            maintenance_team_id: e.maintenance_team_id,
            default_technician_id: e.default_technician_id,
            status: e.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_deserializes_with_nested_team() {
        let json = r#"{
            "items": [
                {"id": 1, "name": "CNC Lathe", "status": "ACTIVE", "serial_number": "SN-1",
                 "created_at": "2024-11-02T10:00:00+00:00",
                 "maintenance_team": {"id": 2, "team_name": "Mechanics",
                                      "created_at": "2024-10-01T00:00:00", "team_members": []},
                 "open_requests_count": 3},
                {"id": 2, "name": "Old Press", "status": "SCRAPPED"}
            ],
            "total": 2
        }"#;
        let list: EquipmentList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.active_count(), 1);
        assert_eq!(list.items[0].open_requests_count, 3);
        assert_eq!(
            list.items[0].maintenance_team.as_ref().unwrap().team_name,
            "Mechanics"
        );
    }

    #[test]
    fn test_input_from_equipment_keeps_fields() {
        let json = r#"{"id": 5, "name": "Forklift", "location": "Dock B",
                       "maintenance_team_id": 3, "status": "ACTIVE"}"#;
        let equipment: Equipment = serde_json::from_str(json).unwrap();
        let input = EquipmentInput::from(&equipment);
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["name"], "Forklift");
        assert_eq!(body["location"], "Dock B");
        assert_eq!(body["maintenance_team_id"], 3);
        // PUT replaces everything, so unset fields are sent as null
        assert!(body["serial_number"].is_null());
        assert_eq!(body["status"], "ACTIVE");
    }
}
