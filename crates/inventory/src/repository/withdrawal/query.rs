use crate::{
    abstract_trait::withdrawal::repository::WithdrawalQueryRepositoryTrait,
    domain::{requests::withdrawal::FindWithdrawalHistory, response::pagination::Pagination},
    model::withdrawal::WithdrawalHistory as WithdrawalHistoryModel,
    repository::withdrawal::HISTORY_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct HistoryCountRow {
    #[sqlx(flatten)]
    row: WithdrawalHistoryModel,
    total_count: i64,
}

pub struct WithdrawalQueryRepository {
    db: ConnectionPool,
}

impl WithdrawalQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WithdrawalQueryRepositoryTrait for WithdrawalQueryRepository {
    async fn find_history(
        &self,
        req: &FindWithdrawalHistory,
    ) -> Result<(Vec<WithdrawalHistoryModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching withdrawal history | staff_id: {:?}, page: {}, page_size: {}",
            req.staff_id, req.page, req.page_size
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let sql = format!(
            r#"
            SELECT {HISTORY_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM withdrawal_history
            WHERE ($1::INT IS NULL OR staff_id = $1)
            ORDER BY created_at DESC, item_id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, HistoryCountRow>(&sql)
            .bind(req.staff_id)
            .bind(req.page_size as i64)
            .bind(Pagination::offset(req.page, req.page_size))
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch withdrawal history: {:?}", e);
                RepositoryError::from(e)
            })?;

        let total = match rows.first() {
            Some(row) => row.total_count,
            None if req.page > 1 => sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM withdrawal_history WHERE ($1::INT IS NULL OR staff_id = $1)",
            )
            .bind(req.staff_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count withdrawal history: {:?}", e);
                RepositoryError::from(e)
            })?,
            None => 0,
        };
        let history = rows.into_iter().map(|r| r.row).collect();

        Ok((history, total))
    }

    async fn find_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<WithdrawalHistoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM withdrawal_history \
             ORDER BY created_at DESC, item_id DESC LIMIT $1"
        );

        sqlx::query_as::<_, WithdrawalHistoryModel>(&sql)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch recent withdrawals: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_for_export(
        &self,
        staff_id: Option<i32>,
    ) -> Result<Vec<WithdrawalHistoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM withdrawal_history \
             WHERE ($1::INT IS NULL OR staff_id = $1) \
             ORDER BY created_at DESC, item_id DESC"
        );

        sqlx::query_as::<_, WithdrawalHistoryModel>(&sql)
            .bind(staff_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch withdrawal history for export: {:?}", e);
                RepositoryError::from(e)
            })
    }
}
