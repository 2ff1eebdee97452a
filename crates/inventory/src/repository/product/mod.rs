pub mod command;
pub mod query;

use crate::domain::status::LOW_STOCK_THRESHOLD;

/// Escapes LIKE wildcards so user input is matched literally.
pub(crate) fn like_pattern(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        return None;
    }

    let escaped = trimmed
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// SQL expression deriving the status label from `quantity`.
pub(crate) fn derived_status_sql() -> String {
    format!(
        "CASE WHEN quantity > {t} THEN 'Available' WHEN quantity > 0 THEN 'Low Stock' ELSE 'Unavailable' END",
        t = LOW_STOCK_THRESHOLD
    )
}
