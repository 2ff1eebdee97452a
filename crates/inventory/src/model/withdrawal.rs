use crate::model::product::Product;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `withdrawal_history` view: a single product line of a
/// withdrawal, joined with its staff member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WithdrawalHistory {
    pub withdrawal_id: i32,
    pub created_at: NaiveDateTime,
    pub staff_id: i32,
    pub staff_name: String,
    pub item_id: i32,
    pub product_id: Option<i32>,
    pub product_name: String,
    pub product_status: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalLine {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct WithdrawalOutcome {
    pub withdrawal_id: i32,
    pub rows: Vec<WithdrawalHistory>,
    pub products: Vec<Product>,
}
