use crate::{
    abstract_trait::{
        dashboard::DashboardServiceTrait, product::service::DynProductQueryService,
        withdrawal::service::DynWithdrawalQueryService,
    },
    domain::response::{api::ApiResponse, dashboard::DashboardResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;

pub const RECENT_WITHDRAWALS_LIMIT: i64 = 10;

/// Home screen summary composed from the product and withdrawal services.
#[derive(Clone)]
pub struct DashboardService {
    products: DynProductQueryService,
    withdrawals: DynWithdrawalQueryService,
}

impl DashboardService {
    pub fn new(products: DynProductQueryService, withdrawals: DynWithdrawalQueryService) -> Self {
        Self {
            products,
            withdrawals,
        }
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn dashboard(&self) -> Result<ApiResponse<DashboardResponse>, ServiceError> {
        let (low_stock, recent) = tokio::try_join!(
            self.products.find_low_stock(),
            self.withdrawals.find_recent(RECENT_WITHDRAWALS_LIMIT),
        )?;

        Ok(ApiResponse::success(
            "Dashboard retrieved successfully",
            DashboardResponse {
                low_stock: low_stock.data,
                recent_withdrawals: recent.data,
            },
        ))
    }
}
