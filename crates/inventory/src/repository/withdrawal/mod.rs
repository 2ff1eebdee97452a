pub mod command;
pub mod query;

/// Columns selected from the `withdrawal_history` view.
pub(crate) const HISTORY_COLUMNS: &str = "withdrawal_id, created_at, staff_id, staff_name, item_id, \
     product_id, product_name, product_status, quantity";
