//! `gearguard report` command - Maintenance statistics
//!
//! Three markdown tables: requests per team, requests per equipment and the
//! preventive/corrective split.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::routes;
use crate::cli::helpers::{print_structured, resolve_format, truncate_str};
use crate::cli::{AppContext, OutputFormat};
use crate::core::cache::keys;
use crate::entities::Report;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Only show the top N rows of the per-team and per-equipment tables
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run(args: ReportArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(routes::REPORTS)?;

    let report = ctx.cached(&keys::reports(), |api| api.reports())?;

    let format = resolve_format(ctx.format(), OutputFormat::Md);
    if args.output.is_none() && print_structured(&report, format)? {
        return Ok(());
    }

    let content = render(&report, args.top);
    write_output(&content, args.output)
}

fn counts_table(header: &str, counts: &[(&str, u64)], top: Option<usize>) -> String {
    let mut table = Builder::default();
    table.push_record([header, "Requests"]);
    let limit = top.unwrap_or(counts.len());
    for (name, count) in counts.iter().take(limit) {
        table.push_record([truncate_str(name, 40), count.to_string()]);
    }
    if counts.is_empty() {
        table.push_record(["(none)".to_string(), "0".to_string()]);
    }
    table.build().with(Style::markdown()).to_string()
}

pub fn render(report: &Report, top: Option<usize>) -> String {
    let mut output = String::new();

    output.push_str("# Maintenance Report\n\n");

    output.push_str("## Requests per Team\n\n");
    output.push_str(&counts_table(
        "Team",
        &Report::ranked(&report.requests_per_team),
        top,
    ));
    output.push_str("\n\n");

    output.push_str("## Requests per Equipment\n\n");
    output.push_str(&counts_table(
        "Equipment",
        &Report::ranked(&report.requests_per_equipment),
        top,
    ));
    output.push_str("\n\n");

    let split = &report.preventive_vs_corrective;
    output.push_str("## Preventive vs Corrective\n\n");
    let mut table = Builder::default();
    table.push_record(["Type", "Requests", "Share"]);
    table.push_record([
        "Preventive".to_string(),
        split.preventive.to_string(),
        format!("{:.1}%", split.preventive_percentage),
    ]);
    table.push_record([
        "Corrective".to_string(),
        split.corrective.to_string(),
        format!("{:.1}%", split.corrective_percentage),
    ]);
    output.push_str(&table.build().with(Style::markdown()).to_string());
    output.push('\n');

    output
}

fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        serde_json::from_str(
            r#"{
                "requests_per_team": {"Mechanics": 2, "Electricians": 5},
                "requests_per_equipment": {"Press": 1},
                "preventive_vs_corrective": {"preventive": 2, "corrective": 6,
                                             "preventive_percentage": 25.0, "corrective_percentage": 75.0}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_sections_in_order() {
        let out = render(&sample(), None);
        let team = out.find("Requests per Team").unwrap();
        let equipment = out.find("Requests per Equipment").unwrap();
        let split = out.find("Preventive vs Corrective").unwrap();
        assert!(team < equipment && equipment < split);
        assert!(out.contains("25.0%"));
        // Highest count first
        assert!(out.find("Electricians").unwrap() < out.find("Mechanics").unwrap());
    }

    #[test]
    fn test_render_top_limits_rows() {
        let out = render(&sample(), Some(1));
        assert!(out.contains("Electricians"));
        assert!(!out.contains("Mechanics"));
    }

    #[test]
    fn test_render_empty_counts() {
        let mut report = sample();
        report.requests_per_equipment.clear();
        assert!(render(&report, None).contains("(none)"));
    }
}
