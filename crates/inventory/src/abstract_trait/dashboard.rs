use crate::domain::response::{api::ApiResponse, dashboard::DashboardResponse};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynDashboardService = Arc<dyn DashboardServiceTrait + Send + Sync>;

#[async_trait]
pub trait DashboardServiceTrait {
    async fn dashboard(&self) -> Result<ApiResponse<DashboardResponse>, ServiceError>;
}
