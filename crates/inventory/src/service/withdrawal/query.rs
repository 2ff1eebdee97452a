use crate::{
    abstract_trait::withdrawal::{
        repository::DynWithdrawalQueryRepository, service::WithdrawalQueryServiceTrait,
    },
    domain::{
        requests::withdrawal::{FindWithdrawalHistory, WithdrawalHistoryFilter},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            export::ExportFile,
            pagination::Pagination,
            withdrawal::WithdrawalHistoryResponse,
        },
    },
    export::{HISTORY_EXPORT_FILE_NAME, withdrawal_history_xlsx},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct WithdrawalQueryService {
    query: DynWithdrawalQueryRepository,
    tracer: OperationTracer,
}

impl WithdrawalQueryService {
    pub fn new(query: DynWithdrawalQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            "withdrawal_query_service",
            "WithdrawalQueryService",
            registry,
        );

        Self {
            query,
            tracer: OperationTracer::new("withdrawal-query-service", metrics),
        }
    }
}

#[async_trait]
impl WithdrawalQueryServiceTrait for WithdrawalQueryService {
    async fn find_history(
        &self,
        req: &FindWithdrawalHistory,
    ) -> Result<ApiResponsePagination<Vec<WithdrawalHistoryResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "withdrawal_find_history",
            vec![
                KeyValue::new("component", "withdrawal"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
                KeyValue::new(
                    "staff.id",
                    req.staff_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
            ],
        );

        let (rows, total) = match self.query.find_history(req).await {
            Ok(res) => res,
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to fetch withdrawal history",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Retrieved {} of {} history rows", rows.len(), total);
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Withdrawal history retrieved");

        let data = rows
            .into_iter()
            .map(WithdrawalHistoryResponse::from)
            .collect();

        Ok(ApiResponsePagination::success(
            "Withdrawal history retrieved successfully",
            data,
            Pagination::new(req.page, req.page_size, total),
        ))
    }

    async fn find_recent(
        &self,
        limit: i64,
    ) -> Result<ApiResponse<Vec<WithdrawalHistoryResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "withdrawal_find_recent",
            vec![
                KeyValue::new("component", "withdrawal"),
                KeyValue::new("limit", limit.to_string()),
            ],
        );

        match self.query.find_recent(limit.max(0)).await {
            Ok(rows) => {
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Recent withdrawals retrieved",
                );
                let data = rows
                    .into_iter()
                    .map(WithdrawalHistoryResponse::from)
                    .collect();
                Ok(ApiResponse::success(
                    "Recent withdrawals retrieved successfully",
                    data,
                ))
            }
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to fetch recent withdrawals",
                );
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn export_xlsx(
        &self,
        filter: &WithdrawalHistoryFilter,
    ) -> Result<ExportFile, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "withdrawal_export",
            vec![KeyValue::new("component", "withdrawal")],
        );

        let rows = match self.query.find_for_export(filter.staff_id).await {
            Ok(rows) => rows,
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to fetch history for export",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        if rows.is_empty() {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "No data to export");
            return Err(ServiceError::validation("No data to export"));
        }

        let rows: Vec<WithdrawalHistoryResponse> = rows
            .into_iter()
            .map(WithdrawalHistoryResponse::from)
            .collect();

        let bytes = match withdrawal_history_xlsx(&rows) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("❌ Failed to build withdrawal history workbook: {e}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to build workbook");
                return Err(ServiceError::Internal(
                    "Failed to build withdrawal history workbook".into(),
                ));
            }
        };

        info!("📄 Exported {} withdrawal rows", rows.len());
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Withdrawal history exported");

        Ok(ExportFile::xlsx(HISTORY_EXPORT_FILE_NAME, bytes))
    }
}
