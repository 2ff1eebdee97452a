use crate::{
    abstract_trait::withdrawal::service::{
        DynWithdrawalCommandService, DynWithdrawalQueryService,
    },
    domain::{
        requests::withdrawal::{
            CreateWithdrawalRequest, FindWithdrawalHistory, WithdrawalHistoryFilter,
        },
        response::{
            api::{ApiResponse, ApiResponsePagination},
            withdrawal::{WithdrawalHistoryResponse, WithdrawalResponse},
        },
    },
    handler::download,
    middleware::{
        jwt::auth_middleware,
        session::session_middleware,
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/withdrawals",
    tag = "Withdrawal",
    security(("bearer_auth" = [])),
    request_body = CreateWithdrawalRequest,
    responses(
        (status = 201, description = "Withdrawal recorded", body = ApiResponse<WithdrawalResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Staff or product not found"),
        (status = 409, description = "Insufficient stock"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_withdrawal(
    Extension(service): Extension<DynWithdrawalCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateWithdrawalRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_withdrawal(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/withdrawals/history",
    tag = "Withdrawal",
    security(("bearer_auth" = [])),
    params(FindWithdrawalHistory),
    responses(
        (status = 200, description = "Withdrawal history, newest first", body = ApiResponsePagination<Vec<WithdrawalHistoryResponse>>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_withdrawal_history(
    Extension(service): Extension<DynWithdrawalQueryService>,
    ValidatedQuery(params): ValidatedQuery<FindWithdrawalHistory>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_history(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/withdrawals/history/export",
    tag = "Withdrawal",
    security(("bearer_auth" = [])),
    params(WithdrawalHistoryFilter),
    responses(
        (status = 200, description = "Withdrawal history workbook (.xlsx)"),
        (status = 400, description = "No data to export"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn export_withdrawal_history(
    Extension(service): Extension<DynWithdrawalQueryService>,
    Query(filter): Query<WithdrawalHistoryFilter>,
) -> Result<impl IntoResponse, HttpError> {
    let file = service.export_xlsx(&filter).await?;
    Ok(download(file))
}

pub fn withdrawal_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/withdrawals", post(create_withdrawal))
        .route("/api/withdrawals/history", get(get_withdrawal_history))
        .route(
            "/api/withdrawals/history/export",
            get(export_withdrawal_history),
        )
        .route_layer(middleware::from_fn(session_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.withdrawal_query.clone()))
        .layer(Extension(app_state.di_container.withdrawal_command.clone()))
        .layer(Extension(app_state.session.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
