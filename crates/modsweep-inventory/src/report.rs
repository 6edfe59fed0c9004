//! Report rendering: structured document and delimited table
//!
//! Pure read-only rendering of a finished [`CollectionReport`]; calling it
//! twice on the same report produces byte-identical output.

use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::types::{CollectionReport, HostResult};

/// Both serialization forms of one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    /// Pretty-printed JSON document keyed by host
    pub json: String,
    /// Comma-separated table, header `host,members`
    pub csv: String,
}

/// Render the report in both output forms
///
/// Hosts appear in case-insensitive order in both documents.
///
/// # Errors
/// Returns `ReportError::Serialize` if the structured document cannot be
/// serialized.
pub fn render(report: &CollectionReport) -> Result<RenderedReport, ReportError> {
    Ok(RenderedReport {
        json: to_json(report)?,
        csv: to_csv(report),
    })
}

/// Structured document: host -> item array, or host -> `{"error": ...}`
///
/// # Errors
/// Returns `ReportError::Serialize` on serialization failure.
pub fn to_json(report: &CollectionReport) -> Result<String, ReportError> {
    let mut document = Map::new();
    for host in report.hosts_sorted() {
        if let Some(result) = report.get(host) {
            document.insert(host.to_string(), serde_json::to_value(result)?);
        }
    }
    Ok(serde_json::to_string_pretty(&Value::Object(document))?)
}

/// Delimited table: one row per host, members joined with `;`
#[must_use]
pub fn to_csv(report: &CollectionReport) -> String {
    let mut out = String::from("host,members\n");

    for host in report.hosts_sorted() {
        let Some(result) = report.get(host) else {
            continue;
        };
        let members = match result {
            HostResult::Success(items) => {
                let entries: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let model = item.model.as_deref().unwrap_or_default();
                        match item.member {
                            Some(member) => format!("{member}:{model}:{}", item.serial),
                            None => format!("{model}:{}", item.serial),
                        }
                    })
                    .collect();
                entries.join(";")
            }
            HostResult::Failure { error } => format!("ERROR: {error}"),
        };

        out.push_str(&escape_host(host));
        out.push(',');
        // The members column routinely carries `;`-joined lists and error
        // text, so it is always quoted
        out.push_str(&quote(&members));
        out.push('\n');
    }

    out
}

fn escape_host(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
