use crate::{
    abstract_trait::staff::DynStaffService,
    domain::{
        requests::staff::CreateStaffRequest,
        response::{api::ApiResponse, staff::StaffResponse},
    },
    middleware::{jwt::auth_middleware, session::session_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Extension, Json,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All staff members", body = ApiResponse<Vec<StaffResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_staff(
    Extension(service): Extension<DynStaffService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = ApiResponse<StaffResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_staff(
    Extension(service): Extension<DynStaffService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub fn staff_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/staff", get(get_staff).post(create_staff))
        .route_layer(middleware::from_fn(session_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.staff_service.clone()))
        .layer(Extension(app_state.session.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
