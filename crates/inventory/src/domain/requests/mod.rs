pub mod auth;
pub mod product;
pub mod staff;
pub mod withdrawal;
