//! `gearguard request` command - Maintenance request management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::{confirm, routes};
use crate::cli::helpers::{
    format_hours, print_field, print_opt_field, print_structured, resolve_format, rule, success,
};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::{keys, Invalidate, Mutation};
use crate::core::client::{ApiClient, RequestQuery, Transport};
use crate::core::kanban::{DropOutcome, KanbanBoard, BOARD_PAGE_SIZE};
use crate::core::validation::validate_new_request;
use crate::entities::{MaintenanceRequest, NewRequest, RequestStatus, RequestType, RequestUpdate};

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// List maintenance requests with filtering
    List(ListArgs),

    /// Show request details
    Show(IdArg),

    /// Raise a new maintenance request
    New(NewArgs),

    /// Update fields of a request
    Update(UpdateArgs),

    /// Delete a request
    Delete(DeleteArgs),

    /// Move a request to another status column (same as dragging a kanban card)
    Move(MoveArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status (new, in-progress, repaired, scrap)
    #[arg(long, short = 's')]
    pub status: Option<RequestStatus>,

    /// Filter by type
    #[arg(long = "type", short = 't')]
    pub request_type: Option<RequestType>,

    /// Filter by equipment id
    #[arg(long)]
    pub equipment: Option<i64>,

    /// Filter by team id
    #[arg(long)]
    pub team: Option<i64>,

    /// Only overdue requests
    #[arg(long)]
    pub overdue: bool,

    /// Records to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,

    /// Maximum records to return (default: config page_size)
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,

    /// Wrap long subjects at this width instead of truncating
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Request id
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Short summary of the problem or job
    #[arg(long)]
    pub subject: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Equipment id
    #[arg(long, short = 'e')]
    pub equipment: i64,

    /// Request type
    #[arg(long = "type", short = 't', default_value = "corrective")]
    pub request_type: RequestType,

    /// Scheduled date (YYYY-MM-DD, required for preventive)
    #[arg(long)]
    pub scheduled: Option<NaiveDate>,

    /// Expected duration in hours
    #[arg(long)]
    pub hours: Option<f64>,

    /// Technician user id
    #[arg(long)]
    pub technician: Option<i64>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Request id
    pub id: i64,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Technician user id
    #[arg(long)]
    pub technician: Option<i64>,

    /// Scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled: Option<NaiveDate>,

    /// Duration in hours
    #[arg(long)]
    pub hours: Option<f64>,

    /// New status
    #[arg(long, short = 's')]
    pub status: Option<RequestStatus>,

    /// Reason when scrapping
    #[arg(long)]
    pub scrap_reason: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Request id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Request id
    pub id: i64,

    /// Destination status (new, in-progress, repaired, scrap)
    pub status: RequestStatus,
}

pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("subject", "SUBJECT", 32),
    ColumnDef::new("type", "TYPE", 12),
    ColumnDef::new("status", "STATUS", 13),
    ColumnDef::new("equipment", "EQUIPMENT", 20),
    ColumnDef::new("technician", "TECHNICIAN", 18),
    ColumnDef::new("scheduled", "SCHEDULED", 11),
    ColumnDef::new("hours", "HOURS", 6),
    ColumnDef::new("overdue", "OVERDUE", 8),
];

pub fn run(cmd: RequestCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        RequestCommands::List(args) => run_list(args, ctx),
        RequestCommands::Show(args) => run_show(args, ctx),
        RequestCommands::New(args) => run_new(args, ctx),
        RequestCommands::Update(args) => run_update(args, ctx),
        RequestCommands::Delete(args) => run_delete(args, ctx),
        RequestCommands::Move(args) => run_move(args, ctx),
    }
}

pub fn request_row(r: &MaintenanceRequest) -> TableRow {
    TableRow::new(r.id)
        .cell("id", CellValue::Id(r.id))
        .cell("subject", CellValue::Text(r.subject.clone()))
        .cell("type", CellValue::RequestType(r.request_type))
        .cell("status", CellValue::Status(r.status.clone()))
        .cell("equipment", CellValue::Text(r.equipment_name()))
        .cell("technician", CellValue::opt_text(r.technician_name()))
        .cell("scheduled", CellValue::opt_date(r.scheduled_date))
        .cell(
            "hours",
            r.duration_hours.map_or(CellValue::Empty, |h| CellValue::Float(h, 1)),
        )
        .cell("overdue", CellValue::Overdue(r.is_overdue))
}

pub fn request_rows(requests: &[MaintenanceRequest]) -> impl Iterator<Item = TableRow> + '_ {
    requests.iter().map(request_row)
}

fn run_list(args: ListArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let query = RequestQuery {
        skip: Some(args.skip),
        limit: Some(args.limit.unwrap_or_else(|| ctx.config.page_size())),
        status: args.status,
        request_type: args.request_type,
        equipment_id: args.equipment,
        team_id: args.team,
    };
    let mut requests = ctx.cached(&keys::request_list(&query), |api| api.list_requests(&query))?;
    if args.overdue {
        requests.retain(|r| r.is_overdue);
    }

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&requests, format)? {
        return Ok(());
    }
    if requests.is_empty() {
        if !ctx.quiet() {
            println!("No maintenance requests found.");
            println!();
            println!("Create one with: {}", style("gearguard request new").yellow());
        }
        return Ok(());
    }
    let config = match args.wrap {
        Some(width) => TableConfig::with_wrap(width),
        None if !console::Term::stdout().is_term() => TableConfig::for_pipe(),
        None => TableConfig::default(),
    };
    TableFormatter::new(COLUMNS, "request")
        .with_config(config)
        .output(request_rows(&requests), format);
    Ok(())
}

fn run_show(args: IdArg, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let r = ctx.cached(&keys::request(args.id), |api| api.get_request(args.id))?;

    let format = resolve_format(ctx.format(), OutputFormat::Yaml);
    if print_structured(&r, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", r.id);
        return Ok(());
    }

    rule();
    print_field("ID", style(r.id).cyan());
    print_field("Subject", style(&r.subject).yellow());
    print_field("Type", r.request_type);
    print_field("Status", r.status.label());
    if r.is_overdue {
        print_field("Overdue", style("yes").red().bold());
    }
    print_field("Equipment", r.equipment_name());
    print_opt_field("Team", r.team_name());
    print_opt_field("Technician", r.technician_name());
    print_opt_field("Scheduled", r.scheduled_date);
    if r.duration_hours.is_some() {
        print_field("Duration", format_hours(r.duration_hours));
    }
    print_opt_field("Scrap reason", r.scrap_reason.as_deref());
    print_field("Created", r.created_at.format("%Y-%m-%d %H:%M"));
    rule();
    if let Some(desc) = r.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("{}", desc);
    }
    Ok(())
}

fn run_new(args: NewArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;
    validate_new_request(&args.subject, args.request_type, args.scheduled)?;

    let body = NewRequest {
        subject: args.subject.trim().to_string(),
        description: args.description.filter(|d| !d.trim().is_empty()),
        equipment_id: args.equipment,
        request_type: args.request_type,
        scheduled_date: args.scheduled,
        duration_hours: args.hours,
        assigned_technician_id: args.technician,
    };
    let created = ctx.api.create_request(&body)?;
    ctx.invalidate(Mutation::Request);

    success(
        ctx.quiet(),
        format!(
            "Created request {} for {}",
            style(created.id).cyan(),
            created.equipment_name()
        ),
    );
    if !ctx.quiet() {
        if let Some(team) = created.team_name() {
            println!("   Team: {}", style(team).dim());
        }
    }
    Ok(())
}

fn run_update(args: UpdateArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let update = RequestUpdate {
        subject: args.subject,
        description: args.description,
        assigned_technician_id: args.technician,
        scheduled_date: args.scheduled,
        duration_hours: args.hours,
        status: args.status,
        scrap_reason: args.scrap_reason,
    };
    if update.is_empty() {
        miette::bail!("nothing to update; pass at least one field");
    }
    if matches!(&update.subject, Some(s) if s.trim().is_empty()) {
        miette::bail!("Subject is required");
    }

    let updated = ctx.api.update_request(args.id, &update)?;
    ctx.invalidate(Mutation::Request);
    success(
        ctx.quiet(),
        format!(
            "Updated request {} ({})",
            style(updated.id).cyan(),
            updated.status.label()
        ),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    if !confirm(&format!("Delete request {}?", args.id), args.yes)? {
        return Ok(());
    }
    ctx.api.delete_request(args.id)?;
    ctx.invalidate(Mutation::Request);
    success(ctx.quiet(), format!("Deleted request {}", args.id));
    Ok(())
}

/// Same path as a kanban drop: load the board, move the card, persist
fn run_move(args: MoveArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let query = RequestQuery::with_limit(BOARD_PAGE_SIZE);
    let requests = ctx.cached(&keys::request_list(&query), |api| api.list_requests(&query))?;
    let mut board = KanbanBoard::from_requests(requests);

    match move_card(&mut board, args.id, args.status.clone(), &ctx.api, &ctx.cache) {
        DropOutcome::Moved => {
            success(
                ctx.quiet(),
                format!("Moved request {} to {}", style(args.id).cyan(), args.status.label()),
            );
            Ok(())
        }
        DropOutcome::Unchanged => {
            if !ctx.quiet() {
                println!("Request {} is already {}.", args.id, args.status.label());
            }
            Ok(())
        }
        DropOutcome::UnknownCard => {
            miette::bail!("request {} is not on the board", args.id)
        }
        DropOutcome::Failed(e) => Err(e.into()),
    }
}

/// Drop a card, then refresh the request-derived queries the board itself
/// does not touch (calendar colours and per-equipment counts).
fn move_card<T: Transport>(
    board: &mut KanbanBoard,
    id: i64,
    status: RequestStatus,
    api: &ApiClient<T>,
    cache: &impl Invalidate,
) -> DropOutcome {
    let outcome = board.drop_card(id, status, api, cache);
    if matches!(outcome, DropOutcome::Moved) {
        let board_key = keys::maintenance_requests();
        let rest: Vec<_> = Mutation::Request
            .invalidates()
            .into_iter()
            .filter(|key| !board_key.is_prefix_of(key))
            .collect();
        cache.invalidate_all(&rest);
    }
    outcome
}
