use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use shared::{abstract_trait::DynRateLimitMiddleware, errors::ErrorResponse};
use tracing::warn;

const MAX_REQUESTS: u32 = 20;
const WINDOW_SECONDS: u32 = 60;

pub async fn rate_limit_middleware(
    Extension(rate_limiter): Extension<DynRateLimitMiddleware>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let client_ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let key = format!("rate_limit:{}:{client_ip}", req.uri().path());

    let (allowed, current) = rate_limiter
        .check_rate_limit(&key, MAX_REQUESTS, WINDOW_SECONDS)
        .await;

    if !allowed {
        warn!(
            "Rate limit exceeded for IP: {} (requests: {})",
            client_ip, current
        );
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::fail(
                "Too many requests, please try again later",
            )),
        ));
    }

    Ok(next.run(req).await)
}
