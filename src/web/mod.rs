//! Web API module for File Hub.
//!
//! This module serves the file API under `/files` and the data API
//! under `/data`, behind an origin allow-list.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
