pub mod product;
pub mod refresh_token;
pub mod staff;
pub mod user;
pub mod withdrawal;
