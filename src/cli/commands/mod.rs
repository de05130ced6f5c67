//! CLI command implementations

pub mod auth;
pub mod board;
pub mod cache;
pub mod calendar;
pub mod completions;
pub mod config;
pub mod dashboard;
pub mod equipment;
pub mod report;
pub mod request;
pub mod team;
pub mod user;

/// Route each command corresponds to; guards are looked up by path
pub mod routes {
    pub const DASHBOARD: &str = "/";
    pub const EQUIPMENT: &str = "/equipment";
    pub const REQUESTS: &str = "/maintenance-requests";
    pub const TEAMS: &str = "/maintenance-teams";
    pub const REPORTS: &str = "/reports";
    pub const ADMIN_USERS: &str = "/admin/users";
}

/// Ask before a destructive action unless `--yes` was given
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> miette::Result<bool> {
    use miette::IntoDiagnostic;

    if assume_yes {
        return Ok(true);
    }
    if !console::user_attended() {
        miette::bail!("refusing to prompt without a terminal; pass --yes to confirm");
    }
    dialoguer::Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}
