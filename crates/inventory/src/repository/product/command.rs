use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::status::ProductStatus, model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, quantity, status, created_at, updated_at)
            VALUES ($1, $2, $3, current_timestamp, current_timestamp)
            RETURNING id, name, quantity, status, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(quantity)
        .bind(status.as_str())
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product '{name}': {:?}", err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created product ID {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name       = $2,
                quantity   = $3,
                status     = $4,
                updated_at = current_timestamp
            WHERE id = $1
            RETURNING id, name, quantity, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(quantity)
        .bind(status.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product ID {id}: {:?}", err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("✅ Updated product ID {}", product.id);
        Ok(product)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete product ID {id}: {:?}", err);
                RepositoryError::from(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted product ID {id}");
        Ok(())
    }

    async fn delete_products(&self, ids: &[i32]) -> Result<Vec<i32>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let deleted: Vec<i32> =
            sqlx::query_scalar("DELETE FROM products WHERE id = ANY($1) RETURNING id")
                .bind(ids)
                .fetch_all(&mut *conn)
                .await
                .map_err(|err| {
                    error!("❌ Failed to bulk delete products {ids:?}: {:?}", err);
                    RepositoryError::from(err)
                })?;

        info!("🗑️ Deleted {} of {} requested products", deleted.len(), ids.len());
        Ok(deleted)
    }
}
