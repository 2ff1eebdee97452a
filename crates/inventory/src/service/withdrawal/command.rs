use crate::{
    abstract_trait::{
        events::DynChangeFeed,
        staff::DynStaffRepository,
        withdrawal::{
            repository::DynWithdrawalCommandRepository, service::WithdrawalCommandServiceTrait,
        },
    },
    domain::{
        event::{ChangeEvent, ChangeOp},
        requests::withdrawal::{
            CreateWithdrawalRequest, MAX_LINE_QUANTITY, WithdrawalItemRequest,
        },
        response::{
            api::ApiResponse,
            product::ProductResponse,
            withdrawal::{WithdrawalHistoryResponse, WithdrawalResponse},
        },
    },
    model::withdrawal::WithdrawalLine,
    service::product::PRODUCT_LIST_CACHE_PATTERN,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    cache::CacheStore,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracer},
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::info;

/// Sums quantities of repeated products. Lines come back sorted by product
/// id, which is also the order rows get locked in. A merged total above
/// [`MAX_LINE_QUANTITY`] is rejected against the item that pushed it over.
pub fn merge_lines(items: &[WithdrawalItemRequest]) -> Result<Vec<WithdrawalLine>, ServiceError> {
    let mut merged: BTreeMap<i32, i32> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        let total = merged.entry(item.product_id).or_insert(0);
        *total = total
            .checked_add(item.quantity)
            .filter(|sum| *sum <= MAX_LINE_QUANTITY)
            .ok_or_else(|| {
                ServiceError::validation(format!("Item {}: quantity is too large", index + 1))
            })?;
    }

    Ok(merged
        .into_iter()
        .map(|(product_id, quantity)| WithdrawalLine {
            product_id,
            quantity,
        })
        .collect())
}

fn validate_items(items: &[WithdrawalItemRequest]) -> Result<(), ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::validation("Please add at least one product"));
    }

    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if item.product_id <= 0 {
            errors.push(format!("Item {}: please select a product", index + 1));
        }
        if item.quantity <= 0 {
            errors.push(format!(
                "Item {}: quantity must be greater than zero",
                index + 1
            ));
        } else if item.quantity > MAX_LINE_QUANTITY {
            errors.push(format!("Item {}: quantity is too large", index + 1));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors))
    }
}

pub struct WithdrawalCommandServiceDeps {
    pub staff: DynStaffRepository,
    pub command: DynWithdrawalCommandRepository,
    pub cache_store: Arc<CacheStore>,
    pub change_feed: DynChangeFeed,
}

#[derive(Clone)]
pub struct WithdrawalCommandService {
    staff: DynStaffRepository,
    command: DynWithdrawalCommandRepository,
    cache_store: Arc<CacheStore>,
    change_feed: DynChangeFeed,
    tracer: OperationTracer,
}

impl WithdrawalCommandService {
    pub fn new(deps: WithdrawalCommandServiceDeps, registry: &mut Registry) -> Self {
        let WithdrawalCommandServiceDeps {
            staff,
            command,
            cache_store,
            change_feed,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(
            "withdrawal_command_service",
            "WithdrawalCommandService",
            registry,
        );

        Self {
            staff,
            command,
            cache_store,
            change_feed,
            tracer: OperationTracer::new("withdrawal-command-service", metrics),
        }
    }
}

#[async_trait]
impl WithdrawalCommandServiceTrait for WithdrawalCommandService {
    async fn create_withdrawal(
        &self,
        req: &CreateWithdrawalRequest,
    ) -> Result<ApiResponse<WithdrawalResponse>, ServiceError> {
        let staff_id = req
            .staff_id
            .ok_or_else(|| ServiceError::validation("Please select a staff member"))?;
        validate_items(&req.items)?;

        let lines = merge_lines(&req.items)?;

        info!(
            "📦 Withdrawing {} product(s) for staff {staff_id}",
            lines.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreateWithdrawal",
            vec![
                KeyValue::new("component", "withdrawal"),
                KeyValue::new("staff.id", staff_id.to_string()),
                KeyValue::new("withdrawal.lines", lines.len().to_string()),
            ],
        );

        match self.staff.find_by_id(staff_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Staff not found");
                return Err(ServiceError::NotFound("Staff not found".into()));
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to fetch staff");
                return Err(ServiceError::Repo(e));
            }
        }

        let outcome = match self.command.create_withdrawal(staff_id, &lines).await {
            Ok(outcome) => outcome,
            Err(RepositoryError::NotFound) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".into()));
            }
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Withdrawal rejected: {e}"),
                );
                return Err(ServiceError::Repo(e));
            }
        };

        let items: Vec<WithdrawalHistoryResponse> = outcome
            .rows
            .into_iter()
            .map(WithdrawalHistoryResponse::from)
            .collect();
        let products: Vec<ProductResponse> = outcome
            .products
            .into_iter()
            .map(ProductResponse::from)
            .collect();

        self.cache_store
            .delete_by_pattern(PRODUCT_LIST_CACHE_PATTERN)
            .await;

        self.change_feed.publish(ChangeEvent::WithdrawalCreated {
            withdrawal_id: outcome.withdrawal_id,
            rows: items.clone(),
        });
        for product in &products {
            self.change_feed.publish(ChangeEvent::ProductChanged {
                op: ChangeOp::Update,
                product_id: product.id,
            });
        }

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Withdrawal recorded");

        Ok(ApiResponse::success(
            "Withdrawal recorded successfully",
            WithdrawalResponse {
                withdrawal_id: outcome.withdrawal_id,
                items,
                products,
            },
        ))
    }
}
