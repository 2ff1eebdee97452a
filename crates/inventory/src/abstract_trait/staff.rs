use crate::{
    domain::{
        requests::staff::CreateStaffRequest,
        response::{api::ApiResponse, staff::StaffResponse},
    },
    model::staff::Staff as StaffModel,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynStaffRepository = Arc<dyn StaffRepositoryTrait + Send + Sync>;
pub type DynStaffService = Arc<dyn StaffServiceTrait + Send + Sync>;

#[async_trait]
pub trait StaffRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<StaffModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<StaffModel>, RepositoryError>;
    async fn create(&self, name: &str) -> Result<StaffModel, RepositoryError>;
}

#[async_trait]
pub trait StaffServiceTrait {
    async fn find_all(&self) -> Result<ApiResponse<Vec<StaffResponse>>, ServiceError>;
    async fn create(
        &self,
        req: &CreateStaffRequest,
    ) -> Result<ApiResponse<StaffResponse>, ServiceError>;
}
