use crate::domain::{
    requests::auth::LoginRequest,
    response::{api::ApiResponse, token::TokenResponse, user::UserResponse},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<TokenResponse>, ServiceError>;
    async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError>;
    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn logout(&self, user_id: i32) -> Result<ApiResponse<()>, ServiceError>;
    async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), ServiceError>;
}
