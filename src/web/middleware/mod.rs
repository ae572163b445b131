//! Middleware for Web API.

pub mod cors;

pub use cors::{cors_guard, create_cors_layer, OriginAllowList, CORS_REJECTED_MESSAGE};
