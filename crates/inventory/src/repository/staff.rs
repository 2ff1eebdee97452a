use crate::{abstract_trait::staff::StaffRepositoryTrait, model::staff::Staff as StaffModel};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct StaffRepository {
    db: ConnectionPool,
}

impl StaffRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StaffRepositoryTrait for StaffRepository {
    async fn find_all(&self) -> Result<Vec<StaffModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, StaffModel>(
            "SELECT id, name, created_at FROM staff ORDER BY LOWER(name) ASC, id ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch staff: {:?}", err);
            RepositoryError::from(err)
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<StaffModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, StaffModel>("SELECT id, name, created_at FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch staff member {id}: {:?}", err);
                RepositoryError::from(err)
            })
    }

    async fn create(&self, name: &str) -> Result<StaffModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let staff = sqlx::query_as::<_, StaffModel>(
            r#"
            INSERT INTO staff (name, created_at)
            VALUES ($1, current_timestamp)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create staff member '{name}': {:?}", err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created staff member ID {}", staff.id);
        Ok(staff)
    }
}
