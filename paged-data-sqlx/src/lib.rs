//! # paged-data-sqlx — SQLx backend for paged-data
//!
//! This crate provides a [SQLx](https://github.com/launchbadge/sqlx)-backed
//! deferred source for [`paged-data`]. Counting and slicing are pushed down
//! to the database as `SELECT COUNT(*)` and `LIMIT/OFFSET` statements.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | Repository wrapper holding an `sqlx::Pool<DB>` for one [`Entity`] |
//! | [`SqlxQuery`] | `AsyncQuery` implementation over a pool and a [`QueryBuilder`] |
//! | [`QueryBuilder`] | Fluent builder for the filtered count and page statements |
//! | [`SqlxErrorExt`] | `.into_page_error()` for `sqlx::Error` |
//! | [`SqlxPageResult<T>`] | Type alias for `Result<PagedResult<T>, PageError<sqlx::Error>>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```ignore
//! use paged_data_sqlx::prelude::*;
//! use sqlx::Sqlite;
//!
//! let repo = SqlxRepository::<Post, Sqlite>::new(pool.clone());
//! let page = repo
//!     .get_paged_list_with(|q| q.order_by("id", true), &PageRequest::new(1, 20), &cancel)
//!     .await?;
//! ```
//!
//! Table, column and ordering names are validated before any SQL is built
//! (see [`IdentifierPolicy`]); an entity's pages are ordered by its
//! [`Entity::id_column`] unless the caller orders them explicitly.
//!
//! Filter values are bound as text. SQLite and MySQL coerce them for
//! numeric columns; on PostgreSQL compare numeric columns through a cast.

pub mod entity;
pub mod error;
pub mod query;
pub mod repository;
pub mod source;

pub use entity::Entity;
pub use error::{SqlxErrorExt, SqlxPageResult};
pub use query::{Dialect, IdentifierPolicy, QueryBuilder, QueryError};
pub use repository::SqlxRepository;
pub use source::{SqlDialect, SqlxQuery};

/// Re-exports of the most commonly used types from both `paged-data` and this crate.
pub mod prelude {
    pub use crate::{Entity, QueryBuilder, SqlxErrorExt, SqlxQuery, SqlxRepository};
    pub use paged_data::prelude::*;
}
