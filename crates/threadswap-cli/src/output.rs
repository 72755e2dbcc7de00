// Rust guideline compliant 2026-10-19

//! Output formatting module for the Threadswap CLI.
//!
//! This module renders listings, ledger pages, audit findings and the
//! outcome of mutating commands as JSON, tables or plain text.

use crate::terminal::{paint, wrap_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tabled::{builder::Builder, settings::Style};
use termcolor::Color;
use threadswap_app::{AppError, ErrorCode, ErrorEnvelope, Page, SuccessEnvelope};
use threadswap_core::{
    Finding, Item, LedgerSummary, OutputFormat, PointTransaction, Severity, SwapRequest,
    UserAccount,
};

/// Outcome of a command, rendered by every formatter.
///
/// `fields` drive the human-readable formats; `payload` is what JSON
/// output emits.
#[derive(Debug, Clone)]
pub struct Report {
    pub headline: String,
    pub fields: Vec<(&'static str, String)>,
    pub payload: serde_json::Value,
}

impl Report {
    /// Creates a report whose JSON payload is `payload`.
    pub fn new<T: Serialize>(headline: impl Into<String>, payload: &T) -> Self {
        Self {
            headline: headline.into(),
            fields: Vec::new(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Appends a labelled line for human-readable output.
    #[must_use]
    pub fn field(mut self, label: &'static str, value: impl ToString) -> Self {
        self.fields.push((label, value.to_string()));
        self
    }
}

/// Output formatter trait.
///
/// Defines the interface for rendering Threadswap data in different output
/// formats.
pub trait OutputFormatter {
    /// Formats a single item with all of its details.
    fn format_item(&self, item: &Item) -> String;

    /// Formats one page of items.
    fn format_items(&self, page: &Page<Item>) -> String;

    /// Formats one page of swap requests.
    fn format_swaps(&self, page: &Page<SwapRequest>) -> String;

    /// Formats a list of accounts.
    fn format_users(&self, users: &[UserAccount]) -> String;

    /// Formats one page of a user's ledger with its totals.
    fn format_ledger(&self, page: &Page<PointTransaction>, summary: &LedgerSummary) -> String;

    /// Formats audit findings.
    fn format_findings(&self, findings: &[Finding]) -> String;

    /// Formats the outcome of a command.
    fn format_report(&self, report: &Report) -> String;

    /// Formats an error for display.
    fn format_error(&self, error: &anyhow::Error) -> String;
}

/// Builds the error envelope for any command failure.
pub fn error_envelope(error: &anyhow::Error) -> ErrorEnvelope {
    if let Some(app) = error.downcast_ref::<AppError>() {
        return ErrorEnvelope::from_error(app);
    }
    ErrorEnvelope {
        code: ErrorCode::Unknown,
        message: error.to_string(),
        details: None,
    }
}

/// Formats a unix timestamp either as UTC or relative to now.
pub fn format_timestamp(timestamp: i64, absolute: bool) -> String {
    let Some(at) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return timestamp.to_string();
    };
    if absolute {
        return at.format("%Y-%m-%d %H:%M UTC").to_string();
    }
    let elapsed = Utc::now().signed_duration_since(at).num_seconds();
    if elapsed >= 30 * 86_400 || elapsed < 0 {
        return at.format("%Y-%m-%d").to_string();
    }
    humanize_elapsed(elapsed)
}

/// Renders a non-negative number of seconds as a short "ago" phrase.
pub fn humanize_elapsed(seconds: i64) -> String {
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

fn page_footer<T>(page: &Page<T>, noun: &str) -> String {
    format!(
        "Page {} of {} ({} {})",
        page.page,
        page.total_pages.max(1),
        page.total,
        noun
    )
}

/// JSON output formatter.
///
/// Wraps every result in the `{"status": "ok", "result": ...}` envelope.
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(&SuccessEnvelope::new(value))
            .unwrap_or_else(|_| json!({ "status": "error", "error": "Failed to serialize output" }).to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_item(&self, item: &Item) -> String {
        Self::render(item)
    }

    fn format_items(&self, page: &Page<Item>) -> String {
        Self::render(page)
    }

    fn format_swaps(&self, page: &Page<SwapRequest>) -> String {
        Self::render(page)
    }

    fn format_users(&self, users: &[UserAccount]) -> String {
        Self::render(&json!({ "users": users, "total": users.len() }))
    }

    fn format_ledger(&self, page: &Page<PointTransaction>, summary: &LedgerSummary) -> String {
        Self::render(&json!({ "entries": page, "summary": summary }))
    }

    fn format_findings(&self, findings: &[Finding]) -> String {
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        Self::render(&json!({
            "findings": findings,
            "errors": errors,
            "warnings": findings.len() - errors,
        }))
    }

    fn format_report(&self, report: &Report) -> String {
        Self::render(&report.payload)
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        json!({ "status": "error", "error": error_envelope(error) }).to_string()
    }
}

/// Table output formatter.
///
/// Formats results as human-readable tables with colors and alignment.
pub struct TableFormatter {
    use_color: bool,
    absolute_time: bool,
}

impl TableFormatter {
    /// Creates a new table formatter.
    pub fn new(use_color: bool, absolute_time: bool) -> Self {
        Self {
            use_color,
            absolute_time,
        }
    }

    fn when(&self, timestamp: i64) -> String {
        format_timestamp(timestamp, self.absolute_time)
    }

    fn status(&self, status: &str) -> String {
        match status_color(status) {
            Some(color) => paint(status, color, false, self.use_color),
            None => status.to_string(),
        }
    }
}

fn status_color(status: &str) -> Option<Color> {
    match status {
        "available" | "completed" => Some(Color::Green),
        "pending" | "pending_approval" | "reserved" => Some(Color::Yellow),
        "accepted" => Some(Color::Cyan),
        "swapped" => Some(Color::Blue),
        "rejected" | "cancelled" => Some(Color::Red),
        _ => None,
    }
}

impl OutputFormatter for TableFormatter {
    fn format_item(&self, item: &Item) -> String {
        let mut output = String::new();

        output.push_str(&format!("ID:          {}\n", item.id));
        output.push_str(&format!("Title:       {}\n", item.title));
        output.push_str(&format!("Status:      {}\n", self.status(item.status.as_str())));
        output.push_str(&format!(
            "Category:    {} / {}\n",
            item.category.as_str(),
            item.item_type
        ));
        output.push_str(&format!("Size:        {}\n", item.size.as_str()));
        output.push_str(&format!(
            "Condition:   {} ({} points)\n",
            item.condition.as_str(),
            item.point_value
        ));
        output.push_str(&format!("Color:       {}\n", item.color));
        if let Some(brand) = &item.brand {
            output.push_str(&format!("Brand:       {}\n", brand));
        }
        if let Some(location) = &item.location {
            output.push_str(&format!("Location:    {}\n", location));
        }
        output.push_str(&format!("Owner:       {}\n", item.owner));
        output.push_str(&format!("Listed:      {}\n", self.when(item.created_at)));
        output.push_str(&format!(
            "Views:       {}   Favorites: {}\n",
            item.views,
            item.favorites.len()
        ));
        if !item.tags.is_empty() {
            output.push_str(&format!("Tags:        {}\n", item.tags.join(", ")));
        }
        if let Some(reason) = &item.rejection_reason {
            output.push_str(&format!("Rejected:    {}\n", reason));
        }
        output.push_str(&format!(
            "Description: {}\n",
            wrap_text(&item.description, 13)
        ));
        output.push_str(&format!("Images:      {}\n", item.images.join(", ")));

        output
    }

    fn format_items(&self, page: &Page<Item>) -> String {
        if page.items.is_empty() {
            return "No items found.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Category", "Size", "Condition", "Points", "Status", "Listed"]);

        for item in &page.items {
            builder.push_record([
                item.id.clone(),
                item.title.clone(),
                item.category.as_str().to_string(),
                item.size.as_str().to_string(),
                item.condition.as_str().to_string(),
                item.point_value.to_string(),
                item.status.as_str().to_string(),
                self.when(item.created_at),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());

        format!("{}\n{}", table, page_footer(page, "items"))
    }

    fn format_swaps(&self, page: &Page<SwapRequest>) -> String {
        if page.items.is_empty() {
            return "No swap requests found.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Status", "Offered", "Requested", "Requester", "Created"]);

        for swap in &page.items {
            builder.push_record([
                swap.id.clone(),
                swap.status.as_str().to_string(),
                swap.item_offered.clone(),
                swap.item_requested.clone(),
                swap.requester.clone(),
                self.when(swap.created_at),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());

        format!("{}\n{}", table, page_footer(page, "requests"))
    }

    fn format_users(&self, users: &[UserAccount]) -> String {
        if users.is_empty() {
            return "No users found.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Username", "Role", "Points", "Active", "Joined"]);

        for user in users {
            builder.push_record([
                user.id.clone(),
                user.username.clone(),
                user.role.as_str().to_string(),
                user.points.to_string(),
                if user.active { "yes" } else { "no" }.to_string(),
                self.when(user.created_at),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_ledger(&self, page: &Page<PointTransaction>, summary: &LedgerSummary) -> String {
        let totals = format!(
            "Earned: {}   Spent: {}   Refunded: {}   Net: {}",
            summary.total_earned, summary.total_spent, summary.total_refunded, summary.net
        );
        if page.items.is_empty() {
            return format!("No ledger entries.\n{}", totals);
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Kind", "Amount", "Description", "Item", "When"]);

        for entry in &page.items {
            builder.push_record([
                entry.id.clone(),
                entry.kind.as_str().to_string(),
                format!("{:+}", entry.amount),
                entry.description.clone(),
                entry.item.clone().unwrap_or_default(),
                self.when(entry.created_at),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());

        format!("{}\n{}\n{}", table, page_footer(page, "entries"), totals)
    }

    fn format_findings(&self, findings: &[Finding]) -> String {
        if findings.is_empty() {
            return "Doctor: no issues found.".to_string();
        }

        let mut output = String::from("Doctor findings:\n");
        for finding in findings {
            let label = match finding.severity {
                Severity::Error => paint("ERROR", Color::Red, true, self.use_color),
                Severity::Warning => paint("WARN", Color::Yellow, true, self.use_color),
            };
            output.push_str(&format!(
                "[{}] {}: {}\n",
                label, finding.subject, finding.message
            ));
        }
        output
    }

    fn format_report(&self, report: &Report) -> String {
        let mut output = format!(
            "{} {}\n",
            paint("✓", Color::Green, true, self.use_color),
            report.headline
        );
        let width = report
            .fields
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        for (label, value) in &report.fields {
            let value = if *label == "Status" {
                self.status(value)
            } else {
                value.clone()
            };
            output.push_str(&format!("  {:<width$}  {}\n", format!("{}:", label), value, width = width + 1));
        }
        output
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        format!("{} {}", paint("Error:", Color::Red, true, self.use_color), error)
    }
}

/// Plain text output formatter.
///
/// One record per line, tab separated, without colors or tables.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_item(&self, item: &Item) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", item.id));
        output.push_str(&format!("{}\n", item.title));
        output.push_str(&format!("{}\n", item.status.as_str()));
        output.push_str(&format!("{}\n", item.condition.as_str()));
        output.push_str(&format!("{}\n", item.point_value));
        output.push_str(&format!("{}\n", item.owner));
        output.push_str(&format!("{}\n", item.description));

        output
    }

    fn format_items(&self, page: &Page<Item>) -> String {
        if page.items.is_empty() {
            return "No items found.".to_string();
        }

        let mut output = String::new();
        for item in &page.items {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                item.id,
                item.status.as_str(),
                item.condition.as_str(),
                item.point_value,
                item.title
            ));
        }
        output
    }

    fn format_swaps(&self, page: &Page<SwapRequest>) -> String {
        if page.items.is_empty() {
            return "No swap requests found.".to_string();
        }

        let mut output = String::new();
        for swap in &page.items {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                swap.id,
                swap.status.as_str(),
                swap.item_offered,
                swap.item_requested
            ));
        }
        output
    }

    fn format_users(&self, users: &[UserAccount]) -> String {
        let mut output = String::new();
        for user in users {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                user.id,
                user.username,
                user.role.as_str(),
                user.points
            ));
        }
        output
    }

    fn format_ledger(&self, page: &Page<PointTransaction>, summary: &LedgerSummary) -> String {
        let mut output = String::new();
        for entry in &page.items {
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                entry.id,
                entry.kind.as_str(),
                entry.amount,
                entry.description
            ));
        }
        output.push_str(&format!("net\t{}\n", summary.net));
        output
    }

    fn format_findings(&self, findings: &[Finding]) -> String {
        let mut output = String::new();
        for finding in findings {
            let label = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            output.push_str(&format!(
                "{}\t{}\t{}\n",
                label, finding.subject, finding.message
            ));
        }
        output
    }

    fn format_report(&self, report: &Report) -> String {
        let mut output = format!("{}\n", report.headline);
        for (_, value) in &report.fields {
            output.push_str(&format!("{}\n", value));
        }
        output
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        format!("Error: {}", error)
    }
}

/// Factory function to create an appropriate formatter.
///
/// # Arguments
/// * `format` - The desired output format
/// * `use_color` - Whether to use colored output (ignored for JSON and plain)
/// * `absolute_time` - Show timestamps as UTC instead of relative ages
pub fn create_formatter(
    format: OutputFormat,
    use_color: bool,
    absolute_time: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter::new(use_color, absolute_time)),
        OutputFormat::Plain => Box::new(PlainFormatter),
    }
}
