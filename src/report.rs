//! Report rendering for scan results.

use crate::scanner::ScanReport;
use crate::types::FieldMatch;

/// Text printed instead of a table when nothing matched.
pub const NO_MATCHES: &str = "No APIs with matching fields found.";

const HEADER: &str = "| Dialect | Service | API | Method | Description | Matching field |\n\
                      | --- | --- | --- | --- | --- | --- |";

/// Render a Markdown table with one row per matching field.
pub fn render_markdown(report: &ScanReport) -> String {
    if report.is_empty() {
        return NO_MATCHES.to_string();
    }

    let mut lines = vec![HEADER.to_string()];
    for record in &report.records {
        for field in &record.matches {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} |",
                record.dialect.display_name(),
                escape_cell(&record.service_name),
                escape_cell(&record.path),
                record.method,
                escape_cell(&record.description),
                escape_cell(&field_cell(field)),
            ));
        }
    }

    lines.join("\n")
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// `location path type[ description]`
fn field_cell(field: &FieldMatch) -> String {
    let mut cell = format!("{} {} {}", field.location, field.field_path, field.field_type);
    if !field.description.is_empty() {
        cell.push(' ');
        cell.push_str(&field.description);
    }
    cell
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
