//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::handlers;

/// Aggregated OpenAPI description, served as `/api-docs/openapi.json`
/// when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "order-notify",
        description = "Real-time order notification broadcaster"
    ),
    paths(
        handlers::notifications::publish_notification,
        handlers::notifications::connection_count,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Notifications", description = "Broadcast and subscriber diagnostics"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
