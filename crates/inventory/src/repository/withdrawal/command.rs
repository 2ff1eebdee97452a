use crate::{
    abstract_trait::withdrawal::repository::WithdrawalCommandRepositoryTrait,
    domain::status::ProductStatus,
    model::{
        product::Product as ProductModel,
        withdrawal::{WithdrawalHistory as WithdrawalHistoryModel, WithdrawalLine, WithdrawalOutcome},
    },
    repository::withdrawal::HISTORY_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

pub struct WithdrawalCommandRepository {
    db: ConnectionPool,
}

impl WithdrawalCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WithdrawalCommandRepositoryTrait for WithdrawalCommandRepository {
    async fn create_withdrawal(
        &self,
        staff_id: i32,
        lines: &[WithdrawalLine],
    ) -> Result<WithdrawalOutcome, RepositoryError> {
        // Dropping `tx` without commit rolls everything back.
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin withdrawal transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let withdrawal_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO withdrawals (staff_id, created_at)
            VALUES ($1, current_timestamp)
            RETURNING id
            "#,
        )
        .bind(staff_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert withdrawal for staff {staff_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut products = Vec::with_capacity(lines.len());

        for line in lines {
            let product = sqlx::query_as::<_, ProductModel>(
                r#"
                SELECT id, name, quantity, status, created_at, updated_at
                FROM products
                WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to lock product {}: {:?}", line.product_id, e);
                RepositoryError::from(e)
            })?
            .ok_or_else(|| {
                warn!("⚠️ Withdrawal references missing product {}", line.product_id);
                RepositoryError::NotFound
            })?;

            let Some(remaining) = product
                .quantity
                .checked_sub(line.quantity)
                .filter(|left| *left >= 0)
            else {
                warn!(
                    "⚠️ Insufficient stock for product {}: requested {}, available {}",
                    product.id, line.quantity, product.quantity
                );
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for {}: requested {}, available {}",
                    product.name, line.quantity, product.quantity
                )));
            };

            let status = ProductStatus::from_quantity(remaining);

            let updated = sqlx::query_as::<_, ProductModel>(
                r#"
                UPDATE products
                SET quantity   = $2,
                    status     = $3,
                    updated_at = current_timestamp
                WHERE id = $1
                RETURNING id, name, quantity, status, created_at, updated_at
                "#,
            )
            .bind(product.id)
            .bind(remaining)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to decrement stock for product {}: {:?}", product.id, e);
                RepositoryError::from(e)
            })?;

            sqlx::query(
                r#"
                INSERT INTO withdrawal_items (withdrawal_id, product_id, product_name, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(withdrawal_id)
            .bind(product.id)
            .bind(&product.name)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to insert withdrawal item: {:?}", e);
                RepositoryError::from(e)
            })?;

            products.push(updated);
        }

        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM withdrawal_history \
             WHERE withdrawal_id = $1 ORDER BY item_id ASC"
        );

        let rows = sqlx::query_as::<_, WithdrawalHistoryModel>(&sql)
            .bind(withdrawal_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to read back withdrawal {withdrawal_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit withdrawal {withdrawal_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Recorded withdrawal {withdrawal_id} for staff {staff_id} with {} line(s)",
            rows.len()
        );

        Ok(WithdrawalOutcome {
            withdrawal_id,
            rows,
            products,
        })
    }
}
