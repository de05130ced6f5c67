//! Client-side form checks run before any network call

use chrono::NaiveDate;
use miette::Diagnostic;
use thiserror::Error;

use crate::entities::{MaintenanceTeam, RequestType};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TEAM_MEMBERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[diagnostic(code(gearguard::validation))]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {} characters long", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Preventive requests need a scheduled date")]
    MissingScheduledDate,

    #[error("A team named '{0}' already exists")]
    DuplicateTeam(String),

    #[error("Team already has the maximum of {} members", MAX_TEAM_MEMBERS)]
    TeamFull,
}

/// Same acceptance as `^[^\s@]+@[^\s@]+\.[^\s@]+$`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // Some dot must have text on both sides
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// Run every signup check, in form order
pub fn validate_signup(email: &str, password: &str, confirm: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_new_request(
    subject: &str,
    request_type: RequestType,
    scheduled_date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::Required("Subject"));
    }
    if request_type == RequestType::Preventive && scheduled_date.is_none() {
        return Err(ValidationError::MissingScheduledDate);
    }
    Ok(())
}

/// Reject blank names and names already taken by another team
pub fn validate_team_name(
    name: &str,
    existing: &[MaintenanceTeam],
    editing: Option<i64>,
) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("Team name"));
    }
    let wanted = trimmed.to_lowercase();
    let clash = existing
        .iter()
        .filter(|t| Some(t.id) != editing)
        .any(|t| t.team_name.trim().to_lowercase() == wanted);
    if clash {
        return Err(ValidationError::DuplicateTeam(trimmed.to_string()));
    }
    Ok(())
}

pub fn check_member_capacity(team: &MaintenanceTeam) -> Result<(), ValidationError> {
    if team.team_members.len() >= MAX_TEAM_MEMBERS {
        return Err(ValidationError::TeamFull);
    }
    Ok(())
}
