use crate::service::auth::SESSION_TTL_MINUTES;
use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use chrono::Duration;
use shared::{abstract_trait::DynSessionMiddleware, cache::Session, errors::ErrorResponse};
use tracing::warn;

/// Requires a live session for the user resolved by `auth_middleware`.
/// A valid JWT alone is not enough once the user has logged out.
pub async fn session_middleware(
    Extension(session_store): Extension<DynSessionMiddleware>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let Some(user_id) = req.extensions().get::<i32>().copied() else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::fail("Missing user_id in request context")),
        ));
    };

    let key = Session::key_for(user_id);

    let session = match session_store.get_session(&key).await {
        Some(session) if session.user_id == user_id => session,
        Some(_) | None => {
            warn!("Session expired or not found for user {user_id}");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::fail("Session expired or not found")),
            ));
        }
    };

    session_store
        .refresh_session(&key, Duration::minutes(SESSION_TTL_MINUTES))
        .await;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
