//! `gearguard team` command - Maintenance teams and membership

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::{confirm, routes};
use crate::cli::helpers::{print_field, print_structured, resolve_format, rule, success};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::{keys, Mutation};
use crate::core::validation::{check_member_capacity, validate_team_name};
use crate::entities::{MaintenanceTeam, MemberAdd, MemberUpdate};

#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// List teams
    List,

    /// Show a team and its members
    Show(IdArg),

    /// Create a team
    New(NameArgs),

    /// Rename a team
    Rename(RenameArgs),

    /// Delete a team
    Delete(DeleteArgs),

    /// Add a user to a team
    MemberAdd(MemberAddArgs),

    /// Remove a user from a team
    MemberRemove(MemberArgs),

    /// Change a member's name within the team
    MemberRename(MemberRenameArgs),
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Team id
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Team name (must be unique)
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Team id
    pub id: i64,

    /// New team name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Team id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct MemberAddArgs {
    /// Team id
    pub team: i64,

    /// User id
    pub user: i64,

    /// Name shown for the member in this team
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct MemberArgs {
    /// Team id
    pub team: i64,

    /// User id
    pub user: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct MemberRenameArgs {
    /// Team id
    pub team: i64,

    /// User id
    pub user: i64,

    /// New display name
    pub display_name: String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("members", "MEMBERS", 8),
    ColumnDef::new("created", "CREATED", 12),
];

const MEMBER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("user", "USER ID", 8),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("username", "USERNAME", 16),
    ColumnDef::new("role", "ROLE", 11),
];

pub fn run(cmd: TeamCommands, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::TEAMS)?;

    match cmd {
        TeamCommands::List => run_list(ctx),
        TeamCommands::Show(args) => run_show(args, ctx),
        TeamCommands::New(args) => run_new(args, ctx),
        TeamCommands::Rename(args) => run_rename(args, ctx),
        TeamCommands::Delete(args) => run_delete(args, ctx),
        TeamCommands::MemberAdd(args) => run_member_add(args, ctx),
        TeamCommands::MemberRemove(args) => run_member_remove(args, ctx),
        TeamCommands::MemberRename(args) => run_member_rename(args, ctx),
    }
}

fn load_teams(ctx: &AppContext) -> Result<Vec<MaintenanceTeam>> {
    ctx.cached(&keys::maintenance_teams(), |api| api.list_teams())
}

fn team_row(team: &MaintenanceTeam) -> TableRow {
    TableRow::new(team.id)
        .cell("id", CellValue::Id(team.id))
        .cell("name", CellValue::Text(team.team_name.clone()))
        .cell("members", CellValue::Number(team.team_members.len() as i64))
        .cell(
            "created",
            team.created_at
                .map(|t| CellValue::Date(t.date_naive()))
                .unwrap_or(CellValue::Empty),
        )
}

fn run_list(ctx: &AppContext) -> Result<()> {
    let teams = load_teams(ctx)?;

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&teams, format)? {
        return Ok(());
    }
    if teams.is_empty() {
        if !ctx.quiet() {
            println!("No teams found.");
            println!();
            println!("Create one with: {}", style("gearguard team new <NAME>").yellow());
        }
        return Ok(());
    }
    TableFormatter::new(COLUMNS, "team").output(teams.iter().map(team_row), format);
    Ok(())
}

fn run_show(args: IdArg, ctx: &AppContext) -> Result<()> {
    let team = ctx.cached(&keys::maintenance_teams().with(args.id), |api| {
        api.get_team(args.id)
    })?;

    let format = resolve_format(ctx.format(), OutputFormat::Yaml);
    if print_structured(&team, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", team.id);
        return Ok(());
    }

    rule();
    print_field("ID", style(team.id).cyan());
    print_field("Team", style(&team.team_name).yellow());
    print_field(
        "Members",
        format!(
            "{}/{}",
            team.team_members.len(),
            crate::core::validation::MAX_TEAM_MEMBERS
        ),
    );
    rule();
    if team.team_members.is_empty() {
        println!("No members yet.");
        return Ok(());
    }
    let rows = team.team_members.iter().map(|m| {
        TableRow::new(m.user_id)
            .cell("user", CellValue::Id(m.user_id))
            .cell("name", CellValue::Text(m.name()))
            .cell("username", CellValue::Text(m.user.username.clone()))
            .cell("role", CellValue::Role(m.user.role))
    });
    TableFormatter::new(MEMBER_COLUMNS, "member").output(rows, OutputFormat::Tsv);
    Ok(())
}

fn run_new(args: NameArgs, ctx: &AppContext) -> Result<()> {
    let existing = ctx.api.list_teams()?;
    validate_team_name(&args.name, &existing, None)?;

    let team = ctx.api.create_team(args.name.trim())?;
    ctx.invalidate(Mutation::Team);
    success(
        ctx.quiet(),
        format!("Created team {} ({})", style(team.id).cyan(), team.team_name),
    );
    Ok(())
}

fn run_rename(args: RenameArgs, ctx: &AppContext) -> Result<()> {
    let existing = ctx.api.list_teams()?;
    validate_team_name(&args.name, &existing, Some(args.id))?;

    let team = ctx.api.rename_team(args.id, args.name.trim())?;
    ctx.invalidate(Mutation::Team);
    success(
        ctx.quiet(),
        format!("Renamed team {} to {}", style(team.id).cyan(), team.team_name),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    if !confirm(&format!("Delete team {}?", args.id), args.yes)? {
        return Ok(());
    }
    ctx.api.delete_team(args.id)?;
    ctx.invalidate(Mutation::Team);
    success(ctx.quiet(), format!("Deleted team {}", args.id));
    Ok(())
}

fn run_member_add(args: MemberAddArgs, ctx: &AppContext) -> Result<()> {
    let team = ctx.api.get_team(args.team)?;
    if team.has_member(args.user) {
        miette::bail!("user {} is already a member of {}", args.user, team.team_name);
    }
    check_member_capacity(&team)?;

    let body = MemberAdd {
        user_id: args.user,
        display_name: args.display_name.filter(|n| !n.trim().is_empty()),
    };
    let team = ctx.api.add_member(args.team, &body)?;
    ctx.invalidate(Mutation::Team);
    success(
        ctx.quiet(),
        format!(
            "Added user {} to {} ({} member(s))",
            style(args.user).cyan(),
            team.team_name,
            team.team_members.len()
        ),
    );
    Ok(())
}

fn run_member_remove(args: MemberArgs, ctx: &AppContext) -> Result<()> {
    if !confirm(
        &format!("Remove user {} from team {}?", args.user, args.team),
        args.yes,
    )? {
        return Ok(());
    }
    ctx.api.remove_member(args.team, args.user)?;
    ctx.invalidate(Mutation::Team);
    success(
        ctx.quiet(),
        format!("Removed user {} from team {}", args.user, args.team),
    );
    Ok(())
}

fn run_member_rename(args: MemberRenameArgs, ctx: &AppContext) -> Result<()> {
    let name = args.display_name.trim();
    if name.is_empty() {
        miette::bail!("Display name is required");
    }
    let body = MemberUpdate {
        display_name: name.to_string(),
    };
    ctx.api.update_member(args.team, args.user, &body)?;
    ctx.invalidate(Mutation::Team);
    success(
        ctx.quiet(),
        format!("Member {} is now shown as {}", args.user, style(name).cyan()),
    );
    Ok(())
}
