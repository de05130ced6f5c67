//! `gearguard dashboard` command - Equipment and request counters

use console::style;
use miette::Result;

use crate::cli::commands::routes;
use crate::cli::helpers::{print_structured, resolve_format};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::keys;
use crate::core::client::{EquipmentQuery, RequestQuery};
use crate::core::kanban::BOARD_PAGE_SIZE;
use crate::core::stats::DashboardStats;

pub fn run(ctx: &AppContext) -> Result<()> {
    let user = ctx.require(routes::DASHBOARD)?;

    let equipment_query = EquipmentQuery {
        limit: Some(BOARD_PAGE_SIZE),
        ..Default::default()
    };
    let equipment = ctx.cached(&keys::equipment_list(&equipment_query), |api| {
        api.list_equipment(&equipment_query)
    })?;
    let request_query = RequestQuery::with_limit(BOARD_PAGE_SIZE);
    let requests = ctx.cached(&keys::request_list(&request_query), |api| {
        api.list_requests(&request_query)
    })?;

    let stats = DashboardStats::compute(&equipment, &requests);

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&stats, format)? {
        return Ok(());
    }

    if let Some(user) = user {
        println!(
            "{} {}",
            style("Welcome,").bold(),
            style(user.display_name()).cyan()
        );
        println!();
    }
    println!("  {:<20} {}", "Total equipment", style(stats.total_equipment).cyan());
    println!("  {:<20} {}", "Active equipment", style(stats.active_equipment).green());
    println!("  {:<20} {}", "Total requests", style(stats.total_requests).cyan());
    println!("  {:<20} {}", "Open requests", style(stats.open_requests).yellow());
    let overdue = if stats.overdue_requests > 0 {
        style(stats.overdue_requests).red().bold()
    } else {
        style(stats.overdue_requests).dim()
    };
    println!("  {:<20} {}", "Overdue requests", overdue);
    Ok(())
}
