//! User accounts and authentication payloads

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::entities::timestamp;

/// Account role; ADMIN unlocks the `/admin` routes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Technician,
    #[default]
    User,
}

impl UserRole {
    /// ADMIN and MANAGER may manage teams, equipment and assignments
    pub fn can_manage(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Manager => write!(f, "MANAGER"),
            UserRole::Technician => write!(f, "TECHNICIAN"),
            UserRole::User => write!(f, "USER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub email: String,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Full name when set, otherwise the username
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Body for `/api/auth/register` and admin-side `/api/auth/users`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Partial update for `PUT /api/auth/users/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_minimal_shape() {
        // Nested users inside equipment responses may omit most fields
        let user: User = serde_json::from_str(r#"{"id": 4, "username": "kim"}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert_eq!(user.display_name(), "kim");
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "username": "admin", "full_name": "Ada Admin", "role": "ADMIN",
                "email": "a@example.com", "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Ada Admin");
        assert!(user.is_admin());
        assert!(user.role.can_manage());
    }

    #[test]
    fn test_register_request_omits_optional_fields() {
        let body = serde_json::to_value(RegisterRequest {
            email: "new@example.com".to_string(),
            username: "newbie".to_string(),
            password: "hunter2hunter2".to_string(),
            full_name: None,
            role: Some(UserRole::User),
        })
        .unwrap();
        assert_eq!(body["role"], "USER");
        assert!(body.get("full_name").is_none());
    }
}
