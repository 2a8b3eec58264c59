//! # locpack-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `locpack-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows, including the relation
//!   tables (visitors, followers, collection members)
//!
//! ## Dependency rule
//! Depends on `locpack-app` (for port traits) and `locpack-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod collection_repo;
mod error;
mod place_repo;
mod pool;
mod row;
mod user_repo;

pub use collection_repo::SqliteCollectionRepository;
pub use error::StorageError;
pub use place_repo::SqlitePlaceRepository;
pub use pool::{Config, Database};
pub use user_repo::SqliteUserRepository;
