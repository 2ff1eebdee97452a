use chrono::NaiveDateTime;

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Timestamp fragment used in generated file names, e.g. `2024-05-01-09-30-00`.
pub fn format_file_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d-%H-%M-%S").to_string()
}
