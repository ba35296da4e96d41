//! Notification handlers: publish and connection diagnostics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ConnectionCountResponse, MAX_KIND_LEN, PublishNotificationRequest,
    PublishNotificationResponse,
};
use crate::app_state::AppState;
use crate::domain::Notification;
use crate::error::{ErrorResponse, NotifyError};

/// `POST /notifications` — Broadcast a notification to every subscriber.
///
/// # Errors
///
/// Returns [`NotifyError::InvalidRequest`] if `type` is empty or too long,
/// or [`NotifyError::Encode`] if the payload cannot be serialized.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "Broadcast a notification",
    description = "Fans the notification out to every connected subscriber. Delivery is best-effort; subscribers whose send fails are disconnected. Only aggregate counts are returned.",
    request_body = PublishNotificationRequest,
    responses(
        (status = 200, description = "Broadcast pass completed", body = PublishNotificationResponse),
        (status = 400, description = "Invalid notification", body = ErrorResponse),
    )
)]
pub async fn publish_notification(
    State(state): State<AppState>,
    Json(req): Json<PublishNotificationRequest>,
) -> Result<impl IntoResponse, NotifyError> {
    let kind = req.kind.trim();
    if kind.is_empty() {
        return Err(NotifyError::InvalidRequest(
            "notification type must not be empty".to_string(),
        ));
    }
    if kind.len() > MAX_KIND_LEN {
        return Err(NotifyError::InvalidRequest(format!(
            "notification type exceeds {MAX_KIND_LEN} characters"
        )));
    }

    let notification = Notification::new(kind, req.payload);
    let outcome = state.dispatcher.broadcast(&notification).await?;

    let response = PublishNotificationResponse {
        message_id: notification.id,
        success: outcome.success,
        failure: outcome.failure,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// `GET /connections` — Number of active subscribers.
#[utoipa::path(
    get,
    path = "/api/v1/connections",
    tag = "Notifications",
    summary = "Active subscriber count",
    description = "Returns how many subscriber connections are currently registered. Diagnostic only.",
    responses(
        (status = 200, description = "Active connection count", body = ConnectionCountResponse),
    )
)]
pub async fn connection_count(State(state): State<AppState>) -> impl IntoResponse {
    let active_connections = state.registry.count().await;
    (
        StatusCode::OK,
        Json(ConnectionCountResponse { active_connections }),
    )
}

/// Notification routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", post(publish_notification))
        .route("/connections", get(connection_count))
}
