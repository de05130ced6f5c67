//! `gearguard cache` command - Manage the local response cache
//!
//! The cache is a SQLite database of recent API responses, keyed by query
//! and scoped per login. Deleting it never loses data.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{print_structured, resolve_format};
use crate::cli::{AppContext, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Clear cached responses
    Clear {
        /// Clear every login's entries, not just the current one
        #[arg(long)]
        all: bool,
    },
}

pub fn run(cmd: CacheCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        CacheCommands::Status => run_status(ctx),
        CacheCommands::Clear { all } => run_clear(ctx, all),
    }
}

fn run_status(ctx: &AppContext) -> Result<()> {
    let stats = ctx.cache.stats().into_diagnostic()?;
    let location = ctx
        .cache
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        let value = serde_json::json!({
            "location": location,
            "ttl_secs": ctx.config.cache_ttl_secs(),
            "total_entries": stats.total_entries,
            "session_entries": stats.scope_entries,
            "scopes": stats.scopes,
        });
        print_structured(&value, format)?;
        return Ok(());
    }

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Location:        {}", location);
    println!("  TTL:             {}s", style(ctx.config.cache_ttl_secs()).cyan());
    println!("  Total entries:   {}", style(stats.total_entries).cyan());
    println!("  This session:    {}", style(stats.scope_entries).cyan());
    println!("  Logins cached:   {}", style(stats.scopes).cyan());
    Ok(())
}

fn run_clear(ctx: &AppContext, all: bool) -> Result<()> {
    let removed = if all {
        ctx.cache.clear()
    } else {
        ctx.cache.clear_scope()
    }
    .into_diagnostic()?;

    if !ctx.quiet() {
        println!(
            "{} Cache cleared ({} entr{} removed)",
            style("✓").green(),
            removed,
            if removed == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}
