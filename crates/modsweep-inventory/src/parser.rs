//! Two-phase parser for device inventory output
//!
//! Device CLI table formats vary by vendor and firmware. The structural
//! phase handles the common tabular case precisely, recovering the
//! member/model association; the fallback phase guarantees best-effort
//! recovery of at least the serial when the table shape is unrecognized.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::InventoryItem;

/// Tabular row: member number, port count, model token, serial token.
/// Matched against the uppercased line, so the serial class needs no
/// lowercase range.
static MODULE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s+\d+\s+(\S+)\s+([A-Z0-9-]{6,})\b").expect("valid pattern"));

/// Labeled serial for the fallback phase: "Serial", "Serial No.",
/// "Serial Number", or "SN", then a value up to whitespace/comma/semicolon.
static SERIAL_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Serial(?:\sNo\.?| Number)?|SN)[:\s]*([^\s,;]+)").expect("valid pattern")
});

/// Extract inventory records from raw device output
///
/// Total: unparseable input yields an empty vec, never an error.
#[must_use]
pub fn parse_inventory(raw: &str) -> Vec<InventoryItem> {
    let mut items = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.contains("model") && lower.contains("serial") {
            // column header
            continue;
        }

        let stripped = line.trim_start_matches('*').trim();
        let upper = stripped.to_uppercase();
        if let Some(caps) = MODULE_ROW.captures(&upper) {
            let member = caps[1].parse::<u32>().ok();
            let model = caps.get(2).map(|m| m.as_str().to_string());
            let serial = caps[3].to_string();
            items.push(InventoryItem {
                member,
                model,
                serial,
            });
        }
    }

    // Fallback: labeled serials, when no tabular row matched
    if items.is_empty() {
        for caps in SERIAL_LABEL.captures_iter(raw) {
            let serial = caps[1].trim_matches(['"', ',']).to_uppercase();
            if serial.len() < 6 || looks_like_mac(&serial) {
                continue;
            }
            items.push(InventoryItem::serial_only(serial));
        }
    }

    debug!(items = items.len(), "parsed inventory output");

    items
}

/// A 12-hex-digit token once punctuation is dropped is a MAC address, not
/// a serial
fn looks_like_mac(token: &str) -> bool {
    token.chars().filter(char::is_ascii_hexdigit).count() == 12
}
