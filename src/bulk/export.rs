//! CSV rendering for `export` operations.

use chrono::Utc;
use serde_json::Value;

use crate::bulk::{EntityType, ExportFile};

/// Renders exported records as a CSV file.
///
/// The header comes from the keys of the first record; every row follows that
/// column order. Cells are always quoted.
pub fn generate_export_file(records: &[Value], entity_type: EntityType) -> ExportFile {
    let columns: Vec<String> = match records.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(columns.join(","));
    for record in records {
        let row = columns
            .iter()
            .map(|column| quote(record.get(column).unwrap_or(&Value::Null)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    ExportFile {
        filename: format!(
            "{}s-export-{}.csv",
            entity_type,
            Utc::now().format("%Y-%m-%d")
        ),
        content_type: "text/csv".to_string(),
        content: lines.join("\n"),
    }
}

fn quote(value: &Value) -> String {
    let raw = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!("\"{}\"", raw.replace('"', "\"\""))
}
