// Rust guideline compliant 2026-10-19

//! Unit tests for output formatting module.

use threadswap_app::Page;
use threadswap_cli::{create_formatter, Report};
use threadswap_core::{
    Category, Condition, Finding, Item, ItemDraft, LedgerSummary, OutputFormat, Severity, Size,
};

fn create_test_item() -> Item {
    let draft = ItemDraft {
        title: "Wool coat".to_string(),
        description: "Charcoal wool coat, warm and lined".to_string(),
        category: Category::Outerwear,
        item_type: "coat".to_string(),
        size: Size::L,
        condition: Condition::Excellent,
        color: "charcoal".to_string(),
        brand: Some("Acme".to_string()),
        location: None,
        tags: vec!["winter".to_string()],
    };
    Item::from_draft(
        "itm-a1b2c3d4".to_string(),
        "usr-00112233".to_string(),
        draft,
        vec!["coat.jpg".to_string()],
        1_704_067_200,
    )
    .expect("valid item")
}

fn page_of(items: Vec<Item>) -> Page<Item> {
    let size = items.len().max(1);
    Page::paginate(items, 1, size)
}

#[test]
fn test_json_formatter_single_item() {
    let item = create_test_item();
    let formatter = create_formatter(OutputFormat::Json, false, false);
    let output = formatter.format_item(&item);

    let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["result"]["id"], "itm-a1b2c3d4");
    assert_eq!(parsed["result"]["point_value"], 100);
}

#[test]
fn test_json_formatter_item_page() {
    let mut second = create_test_item();
    second.id = "itm-d4e5f6a7".to_string();
    let formatter = create_formatter(OutputFormat::Json, false, false);
    let output = formatter.format_items(&page_of(vec![create_test_item(), second]));

    assert!(output.contains("itm-a1b2c3d4"));
    assert!(output.contains("itm-d4e5f6a7"));
    assert!(output.contains("\"total\": 2"));
}

#[test]
fn test_json_formatter_error_envelope() {
    let formatter = create_formatter(OutputFormat::Json, false, false);
    let error = anyhow::Error::new(threadswap_app::AppError::from(
        threadswap_core::Error::InsufficientFunds {
            required: 75,
            available: 10,
        },
    ));
    let output = formatter.format_error(&error);

    let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(parsed["status"], "error");
    assert_eq!(parsed["error"]["code"], "insufficient_funds");
    assert_eq!(parsed["error"]["details"]["required"], 75);
}

#[test]
fn test_json_formatter_unknown_error() {
    let formatter = create_formatter(OutputFormat::Json, false, false);
    let output = formatter.format_error(&anyhow::anyhow!("boom"));
    assert!(output.contains("\"unknown\""));
    assert!(output.contains("boom"));
}

#[test]
fn test_table_formatter_item_details() {
    let formatter = create_formatter(OutputFormat::Table, false, true);
    let output = formatter.format_item(&create_test_item());

    assert!(output.contains("ID:          itm-a1b2c3d4"));
    assert!(output.contains("excellent (100 points)"));
    assert!(output.contains("Brand:       Acme"));
    assert!(output.contains("2024-01-01 00:00 UTC"));
}

#[test]
fn test_table_formatter_empty_page() {
    let formatter = create_formatter(OutputFormat::Table, false, false);
    assert_eq!(formatter.format_items(&page_of(vec![])), "No items found.");
}

#[test]
fn test_table_formatter_list_has_footer() {
    let formatter = create_formatter(OutputFormat::Table, false, true);
    let output = formatter.format_items(&page_of(vec![create_test_item()]));
    assert!(output.contains("Wool coat"));
    assert!(output.contains("Page 1 of 1 (1 items)"));
}

#[test]
fn test_table_formatter_report_fields() {
    let formatter = create_formatter(OutputFormat::Table, false, false);
    let report = Report::new("Redeemed item: itm-a1b2c3d4", &serde_json::json!({}))
        .field("Spent", 100)
        .field("Balance", 25);
    let output = formatter.format_report(&report);

    assert!(output.starts_with("✓ Redeemed item: itm-a1b2c3d4"));
    assert!(output.contains("Spent:"));
    assert!(output.contains("25"));
}

#[test]
fn test_table_formatter_ledger_totals() {
    let formatter = create_formatter(OutputFormat::Table, false, false);
    let summary = LedgerSummary {
        total_earned: 175,
        total_spent: 50,
        total_refunded: 0,
        net: 125,
        entries: 3,
    };
    let page = Page::paginate(Vec::new(), 1, 10);
    let output = formatter.format_ledger(&page, &summary);
    assert!(output.contains("No ledger entries."));
    assert!(output.contains("Net: 125"));
}

#[test]
fn test_plain_formatter_findings() {
    let formatter = create_formatter(OutputFormat::Plain, false, false);
    let findings = vec![Finding {
        severity: Severity::Error,
        subject: "usr-00112233".to_string(),
        message: "Balance mismatch".to_string(),
    }];
    let output = formatter.format_findings(&findings);
    assert_eq!(output, "error\tusr-00112233\tBalance mismatch\n");
}

#[test]
fn test_humanize_elapsed_buckets() {
    use threadswap_cli::output::humanize_elapsed;

    assert_eq!(humanize_elapsed(5), "just now");
    assert_eq!(humanize_elapsed(120), "2m ago");
    assert_eq!(humanize_elapsed(7_200), "2h ago");
    assert_eq!(humanize_elapsed(3 * 86_400), "3d ago");
}
