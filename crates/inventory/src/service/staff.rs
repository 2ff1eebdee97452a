use crate::{
    abstract_trait::staff::{DynStaffRepository, StaffServiceTrait},
    domain::{
        requests::staff::CreateStaffRequest,
        response::{api::ApiResponse, staff::StaffResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use tracing::info;

#[derive(Clone)]
pub struct StaffService {
    repository: DynStaffRepository,
    tracer: OperationTracer,
}

impl StaffService {
    pub fn new(repository: DynStaffRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("staff_service", "StaffService", registry);

        Self {
            repository,
            tracer: OperationTracer::new("staff-service", metrics),
        }
    }
}

#[async_trait]
impl StaffServiceTrait for StaffService {
    async fn find_all(&self) -> Result<ApiResponse<Vec<StaffResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self
            .tracer
            .start_tracing("FindAllStaff", vec![KeyValue::new("component", "staff")]);

        match self.repository.find_all().await {
            Ok(staff) => {
                info!("✅ Found {} staff members", staff.len());
                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, "Staff retrieved");
                let data = staff.into_iter().map(StaffResponse::from).collect();
                Ok(ApiResponse::success("Staff retrieved successfully", data))
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to fetch staff");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn create(
        &self,
        req: &CreateStaffRequest,
    ) -> Result<ApiResponse<StaffResponse>, ServiceError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("Staff name is required"));
        }

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreateStaff",
            vec![
                KeyValue::new("component", "staff"),
                KeyValue::new("staff.name", name.to_string()),
            ],
        );

        match self.repository.create(name).await {
            Ok(staff) => {
                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, "Staff member created");
                Ok(ApiResponse::success(
                    "Staff member created successfully",
                    StaffResponse::from(staff),
                ))
            }
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to create staff member",
                );
                Err(ServiceError::Repo(e))
            }
        }
    }
}
