//! `gearguard login|logout|signup|whoami|status` - session commands

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::routes;
use crate::cli::helpers::{print_field, print_opt_field, print_structured, resolve_format, rule, success};
use crate::cli::{AppContext, OutputFormat};
use crate::core::client::ApiError;
use crate::core::session::{resolve_identity, IdentityState};
use crate::core::validation::validate_signup;
use crate::entities::{RegisterRequest, User, UserRole};

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "GEARGUARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SignupArgs {
    /// Email address
    #[arg(long)]
    pub email: String,

    /// Username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Full name
    #[arg(long)]
    pub full_name: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Password confirmation (prompted when omitted; defaults to --password when only that is given)
    #[arg(long)]
    pub confirm: Option<String>,
}

fn prompt_text(label: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()
        .into_diagnostic()
}

fn prompt_password(label: &str) -> Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact()
        .into_diagnostic()
}

pub fn run_login(args: LoginArgs, ctx: &mut AppContext) -> Result<()> {
    let username = match args.username {
        Some(u) => u,
        None => prompt_text("Username")?,
    };
    let password = match args.password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let token = match ctx.api.login(&username, &password) {
        Ok(token) => token,
        Err(ApiError::Status { status: 401, .. }) => {
            miette::bail!("Incorrect username or password")
        }
        Err(e) => return Err(e.into()),
    };
    ctx.save_login(&username, token.access_token)?;

    let user = ctx.api.me()?;
    tracing::info!(username = %user.username, "logged in");
    success(
        ctx.quiet(),
        format!(
            "Logged in as {} ({})",
            style(user.display_name()).cyan(),
            user.role
        ),
    );
    Ok(())
}

pub fn run_logout(ctx: &mut AppContext) -> Result<()> {
    let was_logged_in = ctx.session.is_logged_in();
    let removed = ctx.logout()?;
    if was_logged_in {
        success(
            ctx.quiet(),
            format!("Logged out ({} cached response(s) dropped)", removed),
        );
    } else if !ctx.quiet() {
        println!("Not logged in.");
    }
    Ok(())
}

/// Register a USER account; every check runs before the network
pub fn run_signup(args: SignupArgs, ctx: &AppContext) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };
    let confirm = match args.confirm {
        Some(c) => c,
        None if console::user_attended() => prompt_password("Confirm password")?,
        None => password.clone(),
    };
    validate_signup(&args.email, &password, &confirm)?;

    let body = RegisterRequest {
        email: args.email,
        username: args.username,
        password,
        full_name: args.full_name.filter(|n| !n.trim().is_empty()),
        role: Some(UserRole::User),
    };
    let user = ctx.api.register(&body)?;
    success(
        ctx.quiet(),
        format!(
            "Account {} created. Log in with {}",
            style(&user.username).cyan(),
            style("gearguard login").yellow()
        ),
    );
    Ok(())
}

pub fn run_whoami(ctx: &AppContext) -> Result<()> {
    let user = ctx.require(routes::DASHBOARD)?;
    let Some(user) = user else {
        return Ok(());
    };
    print_user(&user, ctx.format())
}

fn print_user(user: &User, format: OutputFormat) -> Result<()> {
    let format = resolve_format(format, OutputFormat::Tsv);
    if print_structured(user, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", user.id);
        return Ok(());
    }
    rule();
    print_field("User", style(&user.username).cyan());
    print_opt_field("Name", user.full_name.as_deref());
    print_field("Email", &user.email);
    print_field("Role", user.role);
    print_field("Active", if user.is_active { "yes" } else { "no" });
    rule();
    Ok(())
}

/// Backend health plus what the stored session resolves to
pub fn run_status(ctx: &AppContext) -> Result<()> {
    let server = ctx.server();
    let health = ctx.api.health();
    let identity = match &health {
        Ok(_) => resolve_identity(&ctx.api).ok(),
        Err(_) => None,
    };

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        let report = serde_json::json!({
            "server": server,
            "healthy": health.is_ok(),
            "health": health.as_ref().ok(),
            "user": identity.as_ref().and_then(|i| i.user()).map(|u| &u.username),
        });
        print_structured(&report, format)?;
        return Ok(());
    }

    print_field("Server", style(&server).cyan());
    match &health {
        Ok(body) => {
            let state = body
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("ok")
                .to_string();
            print_field("Backend", style(state).green());
        }
        Err(e) => print_field("Backend", style(format!("unreachable ({})", e)).red()),
    }
    match identity {
        Some(IdentityState::Authenticated(user)) => {
            print_field("Session", format!("{} ({})", user.username, user.role))
        }
        Some(_) => print_field("Session", style("not logged in").yellow()),
        None => print_field("Session", style("unknown").dim()),
    }
    Ok(())
}
