use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i32,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, page_size: i32, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 || page_size <= 0 {
            0
        } else {
            (total_items + page_size as i64 - 1) / page_size as i64
        };

        Self {
            page,
            page_size,
            total_items: total_items.max(0) as i32,
            total_pages: total_pages as i32,
        }
    }

    pub fn offset(page: i32, page_size: i32) -> i64 {
        ((page - 1).max(0) as i64) * page_size as i64
    }
}
