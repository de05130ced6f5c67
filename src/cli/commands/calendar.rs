//! `gearguard calendar` command - Preventive maintenance schedule

use chrono::{Local, NaiveDate};
use console::{style, StyledObject};
use miette::Result;

use crate::cli::commands::routes;
use crate::cli::helpers::{print_structured, resolve_format, truncate_str};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::keys;
use crate::core::calendar::{visible_range, CalendarGrid, CalendarView, EventColor};
use crate::entities::CalendarEvent;

#[derive(clap::Args, Debug)]
pub struct CalendarArgs {
    /// Month, week or day view
    #[arg(long, value_enum, default_value_t = CalendarView::Month)]
    pub view: CalendarView,

    /// Date to centre the view on (YYYY-MM-DD, default today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,
}

pub fn run(args: CalendarArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REQUESTS)?;

    let anchor = args.date.unwrap_or_else(|| Local::now().date_naive());
    let (start, end) = visible_range(args.view, anchor);
    let key = keys::calendar_events().with(start).with(end);
    let events = ctx.cached(&key, |api| api.calendar_events(Some(start), Some(end)))?;

    let format = resolve_format(ctx.format(), OutputFormat::Tsv);
    if print_structured(&events, format)? {
        return Ok(());
    }

    let grid = CalendarGrid::project(&events, args.view, anchor);
    match args.view {
        CalendarView::Month => print_month(&grid),
        CalendarView::Week | CalendarView::Day => print_agenda(&grid),
    }

    if !ctx.quiet() {
        println!();
        println!(
            "{} event(s)  {} overdue  {} repaired  {} scheduled",
            grid.event_count(),
            paint(EventColor::Overdue, "■"),
            paint(EventColor::Repaired, "■"),
            paint(EventColor::Default, "■"),
        );
    }
    Ok(())
}

fn paint<D>(color: EventColor, value: D) -> StyledObject<D> {
    match color {
        EventColor::Overdue => style(value).red(),
        EventColor::Repaired => style(value).green(),
        EventColor::Default => style(value).blue(),
    }
}

fn print_month(grid: &CalendarGrid) {
    println!("{}", style(grid.anchor.format("%B %Y")).bold());
    println!("{}", style("Sun  Mon  Tue  Wed  Thu  Fri  Sat").dim());
    for week in &grid.weeks {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let label = format!("{:>2}", day.date.format("%-d"));
                let marker = match day.events.first() {
                    None => " ".to_string(),
                    Some(_) => {
                        let worst = day
                            .events
                            .iter()
                            .map(EventColor::for_event)
                            .min_by_key(|c| match c {
                                EventColor::Overdue => 0,
                                EventColor::Default => 1,
                                EventColor::Repaired => 2,
                            })
                            .unwrap_or(EventColor::Default);
                        paint(worst, if day.events.len() > 1 { "+" } else { "*" }).to_string()
                    }
                };
                if day.in_range {
                    format!("{}{}  ", label, marker)
                } else {
                    format!("{}{}  ", style(label).dim(), marker)
                }
            })
            .collect();
        println!("{}", cells.concat().trim_end());
    }

    let in_month: Vec<&CalendarEvent> = grid
        .days()
        .filter(|d| d.in_range)
        .flat_map(|d| d.events.iter())
        .collect();
    if !in_month.is_empty() {
        println!();
        for event in in_month {
            println!("{}", event_line(event));
        }
    }
}

fn print_agenda(grid: &CalendarGrid) {
    for day in grid.days() {
        println!("{}", style(day.date.format("%a %Y-%m-%d")).bold());
        if day.events.is_empty() {
            println!("  {}", style("-").dim());
        }
        for event in &day.events {
            println!("  {}", event_line(event));
        }
    }
}

fn event_line(event: &CalendarEvent) -> String {
    let color = EventColor::for_event(event);
    let mut line = format!(
        "{} {} {}",
        style(event.start.format("%m-%d")).dim(),
        style(format!("#{}", event.id)).cyan(),
        paint(color, truncate_str(&event.title, 40)),
    );
    if let Some(equipment) = &event.equipment {
        line.push_str(&format!(" {}", style(format!("({})", equipment)).dim()));
    }
    line.push_str(&format!(" [{}]", event.status.label()));
    line
}
