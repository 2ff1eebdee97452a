pub mod auth;
pub mod dashboard;
pub mod product;
pub mod staff;
pub mod withdrawal;
