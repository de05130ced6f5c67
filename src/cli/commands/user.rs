//! `gearguard user` command - Account administration (admin only)

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::{confirm, routes};
use crate::cli::helpers::{print_structured, resolve_format, success};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::{keys, Mutation};
use crate::core::validation::{is_valid_email, ValidationError, MIN_PASSWORD_LEN};
use crate::entities::{RegisterRequest, User, UserRole, UserUpdate};

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List accounts
    List(ListArgs),

    /// Create an account with any role
    New(NewArgs),

    /// Change fields of an account
    Update(UpdateArgs),

    /// Delete an account
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only accounts with this role
    #[arg(long, short = 'r', value_enum)]
    pub role: Option<UserRole>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, short = 'u')]
    pub username: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long, short = 'r', value_enum, default_value_t = UserRole::User)]
    pub role: UserRole,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// User id
    pub id: i64,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, short = 'u')]
    pub username: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long, short = 'r', value_enum)]
    pub role: Option<UserRole>,

    /// Enable or disable the account
    #[arg(long)]
    pub active: Option<bool>,

    /// Set a new password
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// User id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("username", "USERNAME", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("email", "EMAIL", 28),
    ColumnDef::new("role", "ROLE", 11),
    ColumnDef::new("active", "ACTIVE", 7),
    ColumnDef::new("created", "CREATED", 16),
];

pub fn run(cmd: UserCommands, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::ADMIN_USERS)?;

    match cmd {
        UserCommands::List(args) => run_list(args, ctx),
        UserCommands::New(args) => run_new(args, ctx),
        UserCommands::Update(args) => run_update(args, ctx),
        UserCommands::Delete(args) => run_delete(args, ctx),
    }
}

fn user_row(user: &User) -> TableRow {
    TableRow::new(user.id)
        .cell("id", CellValue::Id(user.id))
        .cell("username", CellValue::Text(user.username.clone()))
        .cell("name", CellValue::opt_text(user.full_name.clone()))
        .cell("email", CellValue::Text(user.email.clone()))
        .cell("role", CellValue::Role(user.role))
        .cell("active", CellValue::Active(user.is_active))
        .cell(
            "created",
            user.created_at.map_or(CellValue::Empty, CellValue::DateTime),
        )
}

fn run_list(args: ListArgs, ctx: &AppContext) -> Result<()> {
    let key = match args.role {
        Some(UserRole::Technician) => keys::technicians(),
        Some(role) => keys::users().with(role),
        None => keys::users(),
    };
    let users = ctx.cached(&key, |api| api.list_users(args.role))?;

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&users, format)? {
        return Ok(());
    }
    if users.is_empty() {
        if !ctx.quiet() {
            println!("No users found.");
        }
        return Ok(());
    }
    TableFormatter::new(COLUMNS, "user").output(users.iter().map(user_row), format);
    Ok(())
}

fn run_new(args: NewArgs, ctx: &AppContext) -> Result<()> {
    if !is_valid_email(&args.email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    if args.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort.into());
    }

    let body = RegisterRequest {
        email: args.email,
        username: args.username,
        password: args.password,
        full_name: args.full_name.filter(|n| !n.trim().is_empty()),
        role: Some(args.role),
    };
    let user = ctx.api.create_user(&body)?;
    ctx.invalidate(Mutation::User);
    success(
        ctx.quiet(),
        format!(
            "Created {} account {} (id {})",
            user.role,
            style(&user.username).cyan(),
            user.id
        ),
    );
    Ok(())
}

fn run_update(args: UpdateArgs, ctx: &AppContext) -> Result<()> {
    if let Some(email) = &args.email {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
    }
    if let Some(password) = &args.password {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort.into());
        }
    }

    let body = UserUpdate {
        email: args.email,
        username: args.username,
        full_name: args.full_name,
        role: args.role,
        is_active: args.active,
        password: args.password,
    };
    let user = ctx.api.update_user(args.id, &body)?;
    ctx.invalidate(Mutation::User);
    success(
        ctx.quiet(),
        format!("Updated {} ({})", style(&user.username).cyan(), user.role),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    if !confirm(&format!("Delete user {}?", args.id), args.yes)? {
        return Ok(());
    }
    ctx.api.delete_user(args.id)?;
    ctx.invalidate(Mutation::User);
    success(ctx.quiet(), format!("Deleted user {}", args.id));
    Ok(())
}
