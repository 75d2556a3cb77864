//! playerctl-server: player roster REST service
//!
//! CRUD over a single `Player` entity with composable filters, sorting and
//! pagination, backed by PostgreSQL or an in-memory store.

pub mod db;
pub mod filter;
pub mod http;
pub mod models;
pub mod service;

pub use filter::{Criterion, PlayerFilter};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use service::{PlayerService, ServiceError};
