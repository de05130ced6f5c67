//! `gearguard board` command - Kanban view of maintenance requests

use console::style;
use miette::Result;

use crate::cli::commands::routes;
use crate::cli::helpers::{print_structured, resolve_format, truncate_str};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::keys;
use crate::core::client::RequestQuery;
use crate::core::kanban::{KanbanBoard, BOARD_PAGE_SIZE, COLUMNS};
use crate::entities::MaintenanceRequest;

#[derive(clap::Args, Debug)]
pub struct BoardArgs {
    /// Only show this team's requests
    #[arg(long)]
    pub team: Option<i64>,

    /// Hide the repaired and scrap columns
    #[arg(long)]
    pub open: bool,
}

pub fn run(args: BoardArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let mut query = RequestQuery::with_limit(BOARD_PAGE_SIZE);
    query.team_id = args.team;
    let requests = ctx.cached(&keys::request_list(&query), |api| api.list_requests(&query))?;
    let board = KanbanBoard::from_requests(requests);

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        let columns: serde_json::Map<String, serde_json::Value> = COLUMNS
            .iter()
            .map(|status| {
                let cards = serde_json::to_value(board.column(status)).unwrap_or_default();
                (status.as_str().to_string(), cards)
            })
            .collect();
        let value = serde_json::json!({
            "columns": columns,
            "unplaced": board.unplaced(),
        });
        print_structured(&value, format)?;
        return Ok(());
    }

    for status in COLUMNS.iter() {
        if args.open && !status.is_open() {
            continue;
        }
        let cards = board.column(status);
        println!(
            "{} {}",
            style(status.label()).bold(),
            style(format!("({})", cards.len())).dim()
        );
        if cards.is_empty() {
            println!("  {}", style("-").dim());
        }
        for card in cards {
            println!("  {}", card_line(card));
        }
        println!();
    }

    if !board.unplaced().is_empty() {
        println!(
            "{} {}",
            style("Not on board").yellow().bold(),
            style("(unrecognized status)").dim()
        );
        for card in board.unplaced() {
            println!("  {} [{}]", card_line(card), card.status.as_str());
        }
        println!();
    }

    if !ctx.quiet() {
        println!(
            "{} card(s). Move one with {}",
            board.card_count(),
            style("gearguard request move <ID> <STATUS>").yellow()
        );
    }
    Ok(())
}

fn card_line(card: &MaintenanceRequest) -> String {
    let mut line = format!(
        "{} {} {}",
        style(format!("#{}", card.id)).cyan(),
        truncate_str(&card.subject, 40),
        style(format!("({})", card.equipment_name())).dim()
    );
    if let Some(tech) = card.technician_name() {
        line.push_str(&format!(" @{}", tech));
    }
    if card.is_overdue {
        line.push_str(&format!(" {}", style("OVERDUE").red().bold()));
    }
    line
}
