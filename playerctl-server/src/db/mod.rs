//! Database layer - connection pool and player stores
//!
//! - `PgPlayerStore`: PostgreSQL via sqlx, dynamic WHERE from `PlayerFilter`
//! - `MemoryPlayerStore`: in-process map with the same semantics

pub mod pool;
pub mod store;
pub mod postgres;
pub mod memory;

pub use pool::{create_pool, create_pool_with_options, run_migrations, DEFAULT_MAX_CONNECTIONS};
pub use store::{DbError, PlayerStore};
pub use postgres::PgPlayerStore;
pub use memory::MemoryPlayerStore;
