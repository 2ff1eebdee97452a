use crate::{
    abstract_trait::events::DynChangeFeed,
    domain::event::ChangeEvent,
    middleware::{jwt::auth_middleware, session::session_middleware},
    state::AppState,
};
use axum::{
    Extension, middleware,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
};
use shared::{abstract_trait::DynSessionMiddleware, cache::Session};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tokio_stream::{
    Stream, StreamExt,
    wrappers::{BroadcastStream, IntervalStream, errors::BroadcastStreamRecvError},
};
use tracing::{error, info, warn};
use utoipa_axum::router::OpenApiRouter;

const KEEP_ALIVE_SECS: u64 = 15;

enum FeedItem {
    Event(SseEvent),
    SessionCheck,
}

/// Turns change events into SSE frames until the subscriber's session is
/// gone. The session is looked up again every `check_every`.
pub fn session_bound_events(
    receiver: broadcast::Receiver<ChangeEvent>,
    session: DynSessionMiddleware,
    user_id: i32,
    check_every: Duration,
) -> impl Stream<Item = Result<SseEvent, Infallible>> + Send + 'static {
    let events = BroadcastStream::new(receiver).filter_map(|item| match item {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(data) => Some(FeedItem::Event(
                SseEvent::default().event(event.channel()).data(data),
            )),
            Err(e) => {
                error!("Failed to serialize change event: {e}");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!("Change stream subscriber lagged, skipped {skipped} event(s)");
            None
        }
    });

    let mut ticker = tokio::time::interval(check_every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let checks = IntervalStream::new(ticker).map(|_| FeedItem::SessionCheck);

    let key = Session::key_for(user_id);

    events
        .merge(checks)
        .then(move |item| {
            let session = session.clone();
            let key = key.clone();
            async move {
                match item {
                    FeedItem::Event(event) => Some(Some(event)),
                    FeedItem::SessionCheck if session.get_session(&key).await.is_some() => {
                        Some(None)
                    }
                    FeedItem::SessionCheck => {
                        info!("🔒 Session {key} ended, closing change stream");
                        None
                    }
                }
            }
        })
        .take_while(Option::is_some)
        .filter_map(|item| item.flatten().map(Ok))
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Server-sent change events named `products` or `withdrawals`"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn stream_events(
    Extension(feed): Extension<DynChangeFeed>,
    Extension(session): Extension<DynSessionMiddleware>,
    Extension(user_id): Extension<i32>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    info!("📡 User {user_id} subscribed to change events");

    let keep_alive = Duration::from_secs(KEEP_ALIVE_SECS);
    let stream = session_bound_events(feed.subscribe(), session, user_id, keep_alive);

    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive))
}

pub fn events_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/events", get(stream_events))
        .route_layer(middleware::from_fn(session_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.change_feed.clone()))
        .layer(Extension(app_state.session.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
