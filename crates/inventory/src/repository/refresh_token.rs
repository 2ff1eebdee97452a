use crate::{
    abstract_trait::refresh_token::RefreshTokenRepositoryTrait,
    model::refresh_token::RefreshToken as RefreshTokenModel,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct RefreshTokenRepository {
    db: ConnectionPool,
}

impl RefreshTokenRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepositoryTrait for RefreshTokenRepository {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expiration: NaiveDateTime,
    ) -> Result<RefreshTokenModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expiration, created_at)
            VALUES ($1, $2, $3, current_timestamp)
            RETURNING refresh_token_id, user_id, token, expiration, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expiration)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("Failed to create refresh token: {}", e);
            RepositoryError::from(e)
        })?;

        info!("Created refresh token for user_id={}", user_id);
        Ok(result)
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            SELECT refresh_token_id, user_id, token, expiration, created_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("Failed to look up refresh token: {}", e);
            RepositoryError::from(e)
        })
    }

    async fn delete_token(&self, token: &str) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("Failed to delete refresh token: {}", e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("Failed to delete refresh tokens for user_id={}: {}", user_id, e);
                RepositoryError::from(e)
            })?;

        info!("Deleted refresh tokens for user_id={}", user_id);
        Ok(())
    }
}
