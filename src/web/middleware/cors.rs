//! CORS middleware configuration.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::ORIGIN, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::cors::{Any, CorsLayer};

use crate::web::dto::MessageResponse;

/// Body message returned for rejected origins.
pub const CORS_REJECTED_MESSAGE: &str = "Not allowed by CORS";

/// Create a CORS layer from configuration.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let layer = CorsLayer::new().allow_methods(methods).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(parsed_origins)
}

/// Origin allow-list. An empty list allows everything.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Arc<Vec<String>>,
}

impl OriginAllowList {
    /// Create an allow-list from configured origins.
    pub fn new(origins: &[String]) -> Self {
        Self {
            origins: Arc::new(origins.to_vec()),
        }
    }

    /// Whether a request with the given `Origin` header may proceed.
    ///
    /// With a non-empty list, requests without an origin are rejected.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        if self.origins.is_empty() {
            return true;
        }
        origin.is_some_and(|o| self.origins.iter().any(|allowed| allowed == o))
    }
}

/// Reject requests from origins outside the allow-list with 403.
pub async fn cors_guard(
    State(allow_list): State<OriginAllowList>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req.headers().get(ORIGIN).and_then(|v| v.to_str().ok());

    if !allow_list.allows(origin) {
        tracing::warn!(origin = origin.unwrap_or("<none>"), "Rejected request origin");
        return (
            StatusCode::FORBIDDEN,
            Json(MessageResponse::new(CORS_REJECTED_MESSAGE)),
        )
            .into_response();
    }

    next.run(req).await
}
