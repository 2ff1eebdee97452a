mod csv;
mod xlsx;

pub use self::csv::{encode_csv, inventory_csv, inventory_file_name};
pub use self::xlsx::{HISTORY_EXPORT_FILE_NAME, HISTORY_SHEET_NAME, withdrawal_history_xlsx};
