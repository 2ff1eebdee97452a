//! Workbook output for the withdrawal history download.

use crate::domain::response::withdrawal::WithdrawalHistoryResponse;
use rust_xlsxwriter::{Workbook, XlsxError};

pub const HISTORY_EXPORT_FILE_NAME: &str = "withdrawal_history.xlsx";
pub const HISTORY_SHEET_NAME: &str = "Withdrawal History";

const HISTORY_HEADER: [&str; 4] = ["Date", "Staff", "Product", "Quantity"];

/// One sheet, one header row, then a row per history line. Quantity is
/// written as a number so it sums in a spreadsheet.
pub fn withdrawal_history_xlsx(rows: &[WithdrawalHistoryResponse]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(HISTORY_SHEET_NAME)?;

    for (col, title) in HISTORY_HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = (index + 1) as u32;
        worksheet.write_string(line, 0, &row.created_at)?;
        worksheet.write_string(line, 1, &row.staff_name)?;
        worksheet.write_string(line, 2, &row.product_name)?;
        worksheet.write_number(line, 3, row.quantity)?;
    }

    worksheet.set_column_width(0, 20)?;
    worksheet.set_column_width(2, 24)?;

    workbook.save_to_buffer()
}
