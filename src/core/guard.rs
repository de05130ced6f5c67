//! Route guards
//!
//! Every command names the route it corresponds to. Guards only decide what
//! the client shows; the backend checks authorization on every call anyway.

use crate::core::session::IdentityState;
use crate::entities::UserRole;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Identity fetch still running; render nothing yet
    Pending,
    Redirect(&'static str),
}

impl Guard {
    pub fn check(&self, identity: &IdentityState) -> GuardOutcome {
        match identity {
            IdentityState::Loading => GuardOutcome::Pending,
            IdentityState::Anonymous => GuardOutcome::Redirect(LOGIN_PATH),
            IdentityState::Authenticated(user) => match self {
                Guard::Admin if user.role != UserRole::Admin => GuardOutcome::Redirect(HOME_PATH),
                _ => GuardOutcome::Allow,
            },
        }
    }
}

/// Guard protecting `path`, or `None` for the public login route
pub fn guard_for_path(path: &str) -> Option<Guard> {
    if path == LOGIN_PATH {
        None
    } else if path == "/admin" || path.starts_with("/admin/") {
        Some(Guard::Admin)
    } else {
        Some(Guard::Authenticated)
    }
}

/// Message shown when a command is refused
pub fn refusal_message(outcome: &GuardOutcome) -> Option<&'static str> {
    match outcome {
        GuardOutcome::Redirect(LOGIN_PATH) => {
            Some("not logged in (run `gearguard login` first)")
        }
        GuardOutcome::Redirect(_) => Some("admin role required"),
        GuardOutcome::Pending => Some("identity not resolved yet"),
        GuardOutcome::Allow => None,
    }
}
