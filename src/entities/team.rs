//! Maintenance teams and their technician membership

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::timestamp;
use crate::entities::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub user_id: i64,
    /// Per-team name for the member; the backend fills it from the user on add
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub user: User,
}

impl TeamMember {
    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.user.display_name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTeam {
    pub id: i64,

    pub team_name: String,

    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

impl MaintenanceTeam {
    pub fn has_member(&self, user_id: i64) -> bool {
        self.team_members.iter().any(|m| m.user_id == user_id)
    }
}

/// Body for team create and rename
#[derive(Debug, Clone, Serialize)]
pub struct TeamInput {
    pub team_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberAdd {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberUpdate {
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_with_members() {
        let json = r#"{
            "id": 1, "team_name": "Electricians", "created_at": "2024-09-09T12:00:00Z",
            "team_members": [
                {"id": 10, "user_id": 5, "display_name": null,
                 "user": {"id": 5, "username": "tech5", "full_name": "Tess Tech",
                          "email": "t@example.com", "role": "TECHNICIAN"}},
                {"id": 11, "user_id": 6, "display_name": "Sparky",
                 "user": {"id": 6, "username": "tech6", "email": "s@example.com",
                          "role": "TECHNICIAN"}}
            ]
        }"#;
        let team: MaintenanceTeam = serde_json::from_str(json).unwrap();
        assert!(team.has_member(5));
        assert!(!team.has_member(7));
        assert_eq!(team.team_members[0].name(), "Tess Tech");
        assert_eq!(team.team_members[1].name(), "Sparky");
    }
}
