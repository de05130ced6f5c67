//! `gearguard equipment` command - Equipment management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::request::request_rows;
use crate::cli::commands::{confirm, request, routes};
use crate::cli::helpers::{print_field, print_opt_field, print_structured, resolve_format, rule, success};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::{keys, Mutation};
use crate::core::client::EquipmentQuery;
use crate::entities::{Equipment, EquipmentInput, EquipmentStatus};

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// List equipment with filtering
    List(ListArgs),

    /// Show equipment details
    Show(ShowArgs),

    /// Register new equipment
    New(EquipmentFields),

    /// Edit equipment (unspecified fields keep their current value)
    Edit(EditArgs),

    /// Delete equipment
    Delete(DeleteArgs),

    /// Maintenance requests raised against a piece of equipment
    Requests(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search name and serial number
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by department
    #[arg(long, short = 'd')]
    pub department: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<EquipmentStatus>,

    /// Records to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,

    /// Maximum records to return (default: config page_size)
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Equipment id
    pub id: i64,
}

#[derive(clap::Args, Debug, Default)]
pub struct EquipmentFields {
    /// Equipment name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub serial_number: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// User the equipment is assigned to
    #[arg(long)]
    pub employee: Option<i64>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Warranty expiry (YYYY-MM-DD)
    #[arg(long)]
    pub warranty_expiry: Option<NaiveDate>,

    #[arg(long)]
    pub location: Option<String>,

    /// Default maintenance team id
    #[arg(long)]
    pub team: Option<i64>,

    /// Default technician id
    #[arg(long)]
    pub technician: Option<i64>,

    #[arg(long)]
    pub status: Option<EquipmentStatus>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Equipment id
    pub id: i64,

    #[command(flatten)]
    pub fields: EquipmentFields,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Equipment id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("serial", "SERIAL", 16),
    ColumnDef::new("department", "DEPARTMENT", 16),
    ColumnDef::new("location", "LOCATION", 16),
    ColumnDef::new("team", "TEAM", 16),
    ColumnDef::new("status", "STATUS", 10),
    ColumnDef::new("open", "OPEN", 6),
];

pub fn run(cmd: EquipmentCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        EquipmentCommands::List(args) => run_list(args, ctx),
        EquipmentCommands::Show(args) => run_show(args, ctx),
        EquipmentCommands::New(fields) => run_new(fields, ctx),
        EquipmentCommands::Edit(args) => run_edit(args, ctx),
        EquipmentCommands::Delete(args) => run_delete(args, ctx),
        EquipmentCommands::Requests(args) => run_requests(args, ctx),
    }
}

fn equipment_row(e: &Equipment) -> TableRow {
    TableRow::new(e.id)
        .cell("id", CellValue::Id(e.id))
        .cell("name", CellValue::Text(e.name.clone()))
        .cell("serial", CellValue::opt_text(e.serial_number.clone()))
        .cell("department", CellValue::opt_text(e.department.clone()))
        .cell("location", CellValue::opt_text(e.location.clone()))
        .cell(
            "team",
            CellValue::opt_text(e.maintenance_team.as_ref().map(|t| t.team_name.clone())),
        )
        .cell("status", CellValue::EquipmentStatus(e.status))
        .cell("open", CellValue::Number(e.open_requests_count as i64))
}

fn run_list(args: ListArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::EQUIPMENT)?;

    let query = EquipmentQuery {
        skip: Some(args.skip),
        limit: Some(args.limit.unwrap_or_else(|| ctx.config.page_size())),
        search: args.search,
        department: args.department,
        status: args.status,
    };
    let list = ctx.cached(&keys::equipment_list(&query), |api| api.list_equipment(&query))?;

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if list.items.is_empty() && !matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        if !ctx.quiet() {
            println!("No equipment found.");
        }
        return Ok(());
    }
    if print_structured(&list, format)? {
        return Ok(());
    }

    TableFormatter::new(COLUMNS, "equipment").output(list.items.iter().map(equipment_row), format);
    if !ctx.quiet() && format == OutputFormat::Tsv && list.total > list.items.len() as u64 {
        println!(
            "{}",
            style(format!(
                "showing {} of {}; use --skip/--limit for more",
                list.items.len(),
                list.total
            ))
            .dim()
        );
    }
    Ok(())
}

fn run_show(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(&format!("{}/{}", routes::EQUIPMENT, args.id))?;

    let equipment = ctx.cached(&keys::equipment(args.id), |api| api.get_equipment(args.id))?;

    let format = resolve_format(ctx.format(), OutputFormat::Yaml);
    if print_structured(&equipment, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", equipment.id);
        return Ok(());
    }

    rule();
    print_field("ID", style(equipment.id).cyan());
    print_field("Name", style(&equipment.name).yellow());
    print_field("Status", equipment.status);
    print_opt_field("Serial", equipment.serial_number.as_deref());
    print_opt_field("Department", equipment.department.as_deref());
    print_opt_field("Location", equipment.location.as_deref());
    print_opt_field(
        "Assigned to",
        equipment.assigned_employee.as_ref().map(|u| u.display_name()),
    );
    print_opt_field(
        "Team",
        equipment.maintenance_team.as_ref().map(|t| t.team_name.as_str()),
    );
    print_opt_field(
        "Technician",
        equipment.default_technician.as_ref().map(|u| u.display_name()),
    );
    print_opt_field("Purchased", equipment.purchase_date);
    print_opt_field("Warranty until", equipment.warranty_expiry);
    rule();
    // Smart button: open request count with a pointer to the full list
    println!(
        "{} open request(s). Run {} to list them.",
        style(equipment.open_requests_count).cyan(),
        style(format!("gearguard equipment requests {}", equipment.id)).yellow()
    );
    Ok(())
}

fn apply_fields(input: &mut EquipmentInput, fields: EquipmentFields) {
    if let Some(v) = fields.name {
        input.name = v;
    }
    if fields.serial_number.is_some() {
        input.serial_number = fields.serial_number;
    }
    if fields.department.is_some() {
        input.department = fields.department;
    }
    if fields.employee.is_some() {
        input.assigned_employee_id = fields.employee;
    }
    if fields.purchase_date.is_some() {
        input.purchase_date = fields.purchase_date;
    }
    if fields.warranty_expiry.is_some() {
        input.warranty_expiry = fields.warranty_expiry;
    }
    if fields.location.is_some() {
        input.location = fields.location;
    }
    if fields.team.is_some() {
        input.maintenance_team_id = fields.team;
    }
    if fields.technician.is_some() {
        input.default_technician_id = fields.technician;
    }
    if let Some(status) = fields.status {
        input.status = status;
    }
}

fn run_new(fields: EquipmentFields, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::EQUIPMENT)?;

    let mut input = EquipmentInput::default();
    apply_fields(&mut input, fields);
    if input.name.trim().is_empty() {
        miette::bail!("--name is required");
    }

    let created = ctx.api.create_equipment(&input)?;
    ctx.invalidate(Mutation::Equipment);
    success(
        ctx.quiet(),
        format!("Created equipment {} ({})", style(created.id).cyan(), created.name),
    );
    Ok(())
}

/// The backend replaces every field on update, so start from the current record
fn run_edit(args: EditArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(&format!("{}/{}", routes::EQUIPMENT, args.id))?;

    let current = ctx.api.get_equipment(args.id)?;
    let mut input = EquipmentInput::from(&current);
    apply_fields(&mut input, args.fields);
    if input.name.trim().is_empty() {
        miette::bail!("equipment name cannot be blank");
    }

    let updated = ctx.api.update_equipment(args.id, &input)?;
    ctx.invalidate(Mutation::Equipment);
    success(
        ctx.quiet(),
        format!("Updated equipment {} ({})", style(updated.id).cyan(), updated.name),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::EQUIPMENT)?;

    if !confirm(
        &format!("Delete equipment {}?", args.id),
        args.yes,
    )? {
        return Ok(());
    }
    ctx.api.delete_equipment(args.id)?;
    ctx.invalidate(Mutation::Equipment);
    success(ctx.quiet(), format!("Deleted equipment {}", args.id));
    Ok(())
}

fn run_requests(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(&format!("{}/{}", routes::EQUIPMENT, args.id))?;

    let requests = ctx.cached(&keys::equipment_requests(args.id), |api| {
        api.equipment_requests(args.id)
    })?;

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&requests, format)? {
        return Ok(());
    }
    if requests.is_empty() {
        if !ctx.quiet() {
            println!("No maintenance requests for equipment {}.", args.id);
        }
        return Ok(());
    }
    TableFormatter::new(request::COLUMNS, "request").output(request_rows(&requests), format);
    Ok(())
}
