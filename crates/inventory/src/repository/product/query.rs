use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::{
        requests::product::FindAllProducts,
        response::pagination::Pagination,
        status::{LOW_STOCK_THRESHOLD, StatusFilter},
    },
    model::product::Product as ProductModel,
    repository::product::{derived_status_sql, like_pattern},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct ProductCountRow {
    #[sqlx(flatten)]
    product: ProductModel,
    total_count: i64,
}

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching products with search: {:?}, status: {}",
            req.search,
            req.status.as_str()
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = Pagination::offset(req.page, req.page_size);

        let sql = format!(
            r#"
            SELECT
                id, name, quantity, status, created_at, updated_at,
                COUNT(*) OVER() AS total_count
            FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
              AND ($2::TEXT IS NULL OR ({status}) = $2)
            ORDER BY LOWER(name) ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            status = derived_status_sql()
        );

        let rows = sqlx::query_as::<_, ProductCountRow>(&sql)
            .bind(like_pattern(&req.search))
            .bind(req.status.as_status().map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let total = match rows.first() {
            Some(row) => row.total_count,
            None if req.page > 1 => {
                let count_sql = format!(
                    r#"
                    SELECT COUNT(*)
                    FROM products
                    WHERE ($1::TEXT IS NULL OR name ILIKE $1)
                      AND ($2::TEXT IS NULL OR ({status}) = $2)
                    "#,
                    status = derived_status_sql()
                );

                sqlx::query_scalar::<_, i64>(&count_sql)
                    .bind(like_pattern(&req.search))
                    .bind(req.status.as_status().map(|s| s.as_str()))
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| {
                        error!("❌ Failed to count products: {:?}", e);
                        RepositoryError::from(e)
                    })?
            }
            None => 0,
        };
        let products = rows.into_iter().map(|r| r.product).collect();

        Ok((products, total))
    }

    async fn find_filtered(
        &self,
        search: &str,
        status: StatusFilter,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            SELECT id, name, quantity, status, created_at, updated_at
            FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
              AND ($2::TEXT IS NULL OR ({status}) = $2)
            ORDER BY LOWER(name) ASC, id ASC
            "#,
            status = derived_status_sql()
        );

        sqlx::query_as::<_, ProductModel>(&sql)
            .bind(like_pattern(search))
            .bind(status.as_status().map(|s| s.as_str()))
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch filtered products: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, quantity, status, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, quantity, status, created_at, updated_at
            FROM products
            WHERE LOWER(name) = LOWER($1)
              AND ($2::INT IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to look up product by name: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_low_stock(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, quantity, status, created_at, updated_at
            FROM products
            WHERE quantity <= $1
            ORDER BY quantity ASC, LOWER(name) ASC
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch low stock products: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
