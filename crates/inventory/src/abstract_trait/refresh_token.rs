use crate::model::refresh_token::RefreshToken as RefreshTokenModel;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynRefreshTokenRepository = Arc<dyn RefreshTokenRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait RefreshTokenRepositoryTrait {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expiration: NaiveDateTime,
    ) -> Result<RefreshTokenModel, RepositoryError>;
    async fn find_by_token(&self, token: &str)
    -> Result<Option<RefreshTokenModel>, RepositoryError>;
    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError>;
    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError>;
}
