//! Spreadsheet-friendly CSV encoding for the inventory download.
//!
//! Output starts with a UTF-8 byte order mark and uses CRLF line endings.
//! Data fields are always double-quoted with embedded quotes doubled.

use crate::domain::response::product::ProductResponse;
use chrono::NaiveDateTime;
use shared::utils::format_file_timestamp;

const BOM: &str = "\u{FEFF}";
const LINE_END: &str = "\r\n";

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn encode_csv<I, R>(header: &[&str], rows: I) -> Vec<u8>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut lines = vec![header.join(",")];

    for row in rows {
        let fields: Vec<String> = row.into_iter().map(|f| quote(&f)).collect();
        lines.push(fields.join(","));
    }

    let mut out = String::from(BOM);
    out.push_str(&lines.join(LINE_END));
    out.into_bytes()
}

pub fn inventory_csv(products: &[ProductResponse]) -> Vec<u8> {
    encode_csv(
        &["ID", "Name", "Quantity", "Status"],
        products.iter().map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                p.quantity.to_string(),
                p.status.to_string(),
            ]
        }),
    )
}

pub fn inventory_file_name(now: &NaiveDateTime) -> String {
    format!("inventory_{}.csv", format_file_timestamp(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::ProductStatus;
    use chrono::NaiveDate;

    fn product(id: i32, name: &str, quantity: i32) -> ProductResponse {
        ProductResponse {
            id,
            name: name.to_string(),
            quantity,
            status: ProductStatus::from_quantity(quantity),
            needs_restock: quantity <= 3,
            created_at: None,
            updated_at: None,
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn inventory_export_has_bom_header_and_crlf() {
        let csv = text(inventory_csv(&[product(1, "Acetone", 10), product(2, "Files", 2)]));

        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(
            csv.trim_start_matches('\u{FEFF}'),
            "ID,Name,Quantity,Status\r\n\
             \"1\",\"Acetone\",\"10\",\"Available\"\r\n\
             \"2\",\"Files\",\"2\",\"Low Stock\""
        );
    }

    #[test]
    fn embedded_quotes_and_commas_are_escaped() {
        let csv = text(inventory_csv(&[product(3, "Gel \"Pro\", 15ml", 0)]));
        assert!(csv.ends_with("\"3\",\"Gel \"\"Pro\"\", 15ml\",\"0\",\"Unavailable\""));
    }

    #[test]
    fn file_name_embeds_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap();
        assert_eq!(inventory_file_name(&now), "inventory_2024-12-31-23-59-01.csv");
    }
}
