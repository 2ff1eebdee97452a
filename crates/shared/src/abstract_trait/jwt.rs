use crate::errors::ServiceError;
use anyhow::Result;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, user_id: i32, token_type: &str) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i32, ServiceError>;
    fn expiration_of(&self, token_type: &str) -> Result<NaiveDateTime, ServiceError>;
}
