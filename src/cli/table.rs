//! Table formatting utilities for CLI list commands
//!
//! Every list command describes its columns once and hands typed rows to
//! [`TableFormatter`], which renders TSV, CSV, Markdown or bare IDs.
//!
//! # Text Wrapping
//!
//! `TableConfig::with_wrap(width)` word-wraps text columns in TSV output
//! instead of truncating them. CSV and ID formats stay single-line.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::{EquipmentStatus, RequestStatus, RequestType, UserRole};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show summary line after table (e.g., "5 request(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            show_summary: true,
        }
    }

    /// No wrapping, no summary
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current_line.chars().count();
        if !current_line.is_empty() && current_len + 1 + word_len <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            continue;
        }
        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }
        // Force-break words longer than a line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current_line = piece;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record id (cyan)
    Id(i64),
    /// Plain text, truncated to the column
    Text(String),
    /// Request status with color coding
    Status(RequestStatus),
    /// Request kind
    RequestType(RequestType),
    /// Equipment lifecycle state
    EquipmentStatus(EquipmentStatus),
    /// Account role
    Role(UserRole),
    /// Overdue flag (yes = red bold)
    Overdue(bool),
    /// Active flag for users
    Active(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp displayed in local time
    DateTime(DateTime<Utc>),
    Number(i64),
    /// Float with precision
    Float(f64, usize),
    Empty,
}

impl CellValue {
    /// Text cell, or Empty when the value is missing or blank
    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(s) if !s.trim().is_empty() => CellValue::Text(s),
            _ => CellValue::Empty,
        }
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Date)
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    RequestStatus::New => style(&s).cyan(),
                    RequestStatus::InProgress => style(&s).yellow(),
                    RequestStatus::Repaired => style(&s).green(),
                    RequestStatus::Scrap => style(&s).red().dim(),
                    RequestStatus::Unrecognized(_) => style(&s).magenta(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::RequestType(t) => {
                let s = t.to_string();
                let styled = match t {
                    RequestType::Corrective => style(&s).yellow(),
                    RequestType::Preventive => style(&s).blue(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::EquipmentStatus(status) => {
                let s = status.to_string();
                let styled = match status {
                    EquipmentStatus::Active => style(&s).green(),
                    EquipmentStatus::Scrapped => style(&s).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Role(role) => {
                let s = role.to_string();
                let styled = match role {
                    UserRole::Admin => style(&s).red().bold(),
                    UserRole::Manager => style(&s).magenta(),
                    UserRole::Technician => style(&s).cyan(),
                    UserRole::User => style(&s).white(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Overdue(b) => {
                if *b {
                    format!("{:<width$}", style("yes").red().bold(), width = width)
                } else {
                    format!("{:<width$}", style("no").dim(), width = width)
                }
            }
            CellValue::Active(b) => {
                if *b {
                    format!("{:<width$}", style("yes").green(), width = width)
                } else {
                    format!("{:<width$}", style("no").dim(), width = width)
                }
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
            other => format!("{:<width$}", other.raw(), width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Text(s) => escape_csv(s),
            CellValue::Status(status) => escape_csv(status.as_str()),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%dT%H:%M:%S").to_string()
            }
            other => other.raw(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Status(status) => status.label().to_string(),
            CellValue::Overdue(true) => "**yes**".to_string(),
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::RequestType(t) => t.to_string(),
            CellValue::EquipmentStatus(s) => s.to_string(),
            CellValue::Role(r) => r.to_string(),
            CellValue::Overdue(b) | CellValue::Active(b) => {
                if *b {
                    "yes".to_string()
                } else {
                    "no".to_string()
                }
            }
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d %H:%M").to_string()
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Empty => String::new(),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Overdue(_) | CellValue::Active(_) => 3,
            CellValue::Date(_) => 10,
            CellValue::DateTime(_) => 16,
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        print!("{}", self.render(rows, format));
    }

    pub fn render<I>(&self, rows: I, format: OutputFormat) -> String
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        match format {
            OutputFormat::Csv => self.render_csv(&rows),
            OutputFormat::Md => self.render_md(&rows),
            OutputFormat::Id => self.render_ids(&rows),
            _ => self.render_tsv(&rows),
        }
    }

    /// Dynamic column widths capped at each column's configured width
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // +2 leaves room for truncate_str's ellipsis
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            match self.config.wrap_width {
                Some(wrap) => self.render_tsv_row_wrapped(&mut out, row, &widths, wrap),
                None => {
                    let parts: Vec<String> = self
                        .columns
                        .iter()
                        .zip(&widths)
                        .map(|(col, w)| match row.get(col.key) {
                            Some(value) => value.format_tsv(*w),
                            None => format!("{:<width$}", "-", width = *w),
                        })
                        .collect();
                    out.push_str(parts.join(" ").trim_end());
                    out.push('\n');
                }
            }
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found\n",
                style(rows.len()).cyan(),
                self.entity_name
            ));
        }
        out
    }

    fn render_tsv_row_wrapped(
        &self,
        out: &mut String,
        row: &TableRow,
        widths: &[usize],
        wrap: usize,
    ) {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| match row.get(col.key) {
                Some(value @ CellValue::Text(_)) => wrap_text(&value.raw(), wrap),
                Some(value) => vec![value.raw()],
                None => vec!["-".to_string()],
            })
            .collect();

        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        for line_idx in 0..max_lines {
            let parts: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(lines, w)| {
                    let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", content, width = *w)
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }
        if max_lines > 1 {
            out.push('\n');
        }
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }

    fn render_ids(&self, rows: &[TableRow]) -> String {
        rows.iter().map(|r| format!("{}\n", r.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 6),
        ColumnDef::new("subject", "SUBJECT", 30),
        ColumnDef::new("status", "STATUS", 12),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new(3)
                .cell("id", CellValue::Id(3))
                .cell("subject", CellValue::Text("Pump | seal".to_string()))
                .cell("status", CellValue::Status(RequestStatus::InProgress)),
            TableRow::new(8)
                .cell("id", CellValue::Id(8))
                .cell("subject", CellValue::Text("Replace, belt".to_string())),
        ]
    }

    #[test]
    fn test_csv_escapes_and_fills_missing() {
        let out = TableFormatter::new(COLUMNS, "request").render(rows(), OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,subject,status");
        assert_eq!(lines[1], "3,Pump | seal,IN_PROGRESS");
        assert_eq!(lines[2], "8,\"Replace, belt\",");
    }

    #[test]
    fn test_md_escapes_pipes_and_uses_labels() {
        let out = TableFormatter::new(COLUMNS, "request").render(rows(), OutputFormat::Md);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| ID | SUBJECT | STATUS |");
        assert_eq!(lines[1], "|---|---|---|");
        assert_eq!(lines[2], "| 3 | Pump \\| seal | In Progress |");
        assert_eq!(lines[3], "| 8 | Replace, belt | - |");
    }

    #[test]
    fn test_ids_only() {
        let out = TableFormatter::new(COLUMNS, "request").render(rows(), OutputFormat::Id);
        assert_eq!(out, "3\n8\n");
    }

    #[test]
    fn test_tsv_summary_can_be_disabled() {
        console::set_colors_enabled(false);
        let with = TableFormatter::new(COLUMNS, "request").render(rows(), OutputFormat::Tsv);
        assert!(with.contains("2 request(s) found"));

        let without = TableFormatter::new(COLUMNS, "request")
            .with_config(TableConfig::for_pipe())
            .render(rows(), OutputFormat::Tsv);
        assert!(!without.contains("found"));
        assert!(without.contains("IN_PROGRESS"));
    }

    #[test]
    fn test_cell_helpers() {
        assert!(matches!(CellValue::opt_text(None::<String>), CellValue::Empty));
        assert!(matches!(CellValue::opt_text(Some("  ")), CellValue::Empty));
        assert_eq!(CellValue::Overdue(true).raw(), "yes");
        assert_eq!(CellValue::Float(2.5, 1).raw(), "2.5");
        assert_eq!(
            CellValue::opt_date(NaiveDate::from_ymd_opt(2025, 4, 1)).raw(),
            "2025-04-01"
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("hello", 10), vec!["hello"]);
        assert_eq!(wrap_text("hello world foo", 11), vec!["hello world", "foo"]);
        assert_eq!(wrap_text("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }
}
