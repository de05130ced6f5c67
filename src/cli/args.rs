//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    auth::{LoginArgs, SignupArgs},
    board::BoardArgs,
    cache::CacheCommands,
    calendar::CalendarArgs,
    completions::CompletionsArgs,
    config::ConfigCommands,
    equipment::EquipmentCommands,
    report::ReportArgs,
    request::RequestCommands,
    team::TeamCommands,
    user::UserCommands,
};

#[derive(Parser)]
#[command(name = "gearguard")]
#[command(author, version, about = "GearGuard maintenance tracker client")]
#[command(
    long_about = "Command-line client for a GearGuard backend: equipment, maintenance requests, teams, the kanban board and the preventive maintenance calendar."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Backend URL (overrides config and GEARGUARD_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store a session token
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Create a new account
    Signup(SignupArgs),

    /// Show the logged-in user
    Whoami,

    /// Check backend health and session state
    Status,

    /// Equipment management
    #[command(subcommand)]
    Equipment(EquipmentCommands),

    /// Maintenance request management
    #[command(subcommand, visible_alias = "req")]
    Request(RequestCommands),

    /// Kanban board of requests by status
    Board(BoardArgs),

    /// Preventive maintenance calendar
    Calendar(CalendarArgs),

    /// Maintenance team management
    #[command(subcommand)]
    Team(TeamCommands),

    /// User administration (ADMIN only)
    #[command(subcommand)]
    User(UserCommands),

    /// Request counts per team, per equipment and by type
    Report(ReportArgs),

    /// Equipment and request counters
    Dashboard,

    /// Local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Case-insensitive parse of a configured format name
    pub fn from_str_ci(name: &str) -> Option<Self> {
        <OutputFormat as ValueEnum>::from_str(name, true).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_calendar_view_has_no_short_flag() {
        let cli = Cli::try_parse_from(["gearguard", "calendar", "-v", "--view", "week"])
            .unwrap();
        assert!(cli.global.verbose);
    }
}
