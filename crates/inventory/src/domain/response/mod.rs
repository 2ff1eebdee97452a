pub mod api;
pub mod dashboard;
pub mod export;
pub mod pagination;
pub mod product;
pub mod staff;
pub mod token;
pub mod user;
pub mod withdrawal;
