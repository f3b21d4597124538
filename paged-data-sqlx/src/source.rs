use crate::entity::Entity;
use crate::query::{Dialect, QueryBuilder};
use sqlx::{Database, Pool};
use std::marker::PhantomData;

/// Maps a `sqlx` database type to the placeholder dialect it speaks.
pub trait SqlDialect: Database {
    const DIALECT: Dialect;
}

#[cfg(feature = "sqlite")]
impl SqlDialect for sqlx::Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

#[cfg(feature = "postgres")]
impl SqlDialect for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::Postgres;
}

#[cfg(feature = "mysql")]
impl SqlDialect for sqlx::MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

/// Largest offset or limit the drivers accept (`BIGINT`).
const MAX_BOUND: u64 = i64::MAX as u64;

/// A deferred query against a database pool.
///
/// Implements [`paged_data::AsyncQuery`]: `count` runs `SELECT COUNT(*)` with
/// the builder's filter, `fetch` runs the filtered, ordered select with
/// `LIMIT/OFFSET`. Each is a separate round-trip on the pool.
pub struct SqlxQuery<T, DB: Database> {
    pool: Pool<DB>,
    builder: QueryBuilder,
    columns: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, DB: SqlDialect> SqlxQuery<T, DB> {
    pub fn new(pool: Pool<DB>, builder: QueryBuilder, columns: &[&str]) -> Self {
        Self {
            pool,
            builder: builder.dialect(DB::DIALECT),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            _marker: PhantomData,
        }
    }

    /// Query every row of `T`'s table, selecting `T::columns()`.
    ///
    /// Rows come back by ascending `T::id_column()` unless an explicit
    /// `order_by` is added through [`filter`](Self::filter).
    pub fn for_entity(pool: Pool<DB>) -> Self
    where
        T: Entity,
    {
        Self::new(
            pool,
            QueryBuilder::new(T::table_name()).default_order_by(T::id_column(), true),
            T::columns(),
        )
    }

    /// Refine the underlying query (filters, ordering).
    pub fn filter(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.builder = f(self.builder).dialect(DB::DIALECT);
        self
    }
}

impl<T, DB: Database> SqlxQuery<T, DB> {
    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T, DB: Database> Clone for SqlxQuery<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            builder: self.builder.clone(),
            columns: self.columns.clone(),
            _marker: PhantomData,
        }
    }
}

/// A driver's `COUNT(*)` as a row count; a negative value is a decode error.
fn row_count(total: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(total).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// `AsyncQuery` for one concrete driver.
macro_rules! impl_async_query {
    ($db:ty) => {
        impl<T> paged_data::AsyncQuery<T> for SqlxQuery<T, $db>
        where
            T: for<'r> sqlx::FromRow<'r, <$db as Database>::Row> + Send + Unpin,
        {
            type Error = sqlx::Error;

            async fn count(&self) -> Result<u64, sqlx::Error> {
                let (sql, params) = self.builder.build_count()?;
                tracing::trace!(sql = %sql, params = params.len(), "counting rows");
                let mut query = sqlx::query_scalar::<$db, i64>(&sql);
                for param in params {
                    query = query.bind(param);
                }
                let total = query.fetch_one(&self.pool).await?;
                row_count(total)
            }

            async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, sqlx::Error> {
                let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
                let (sql, params) = self
                    .builder
                    .page(offset.min(MAX_BOUND), limit.min(MAX_BOUND))
                    .build_select(&columns)?;
                tracing::trace!(sql = %sql, params = params.len(), "fetching rows");
                let mut query = sqlx::query_as::<$db, T>(&sql);
                for param in params {
                    query = query.bind(param);
                }
                query.fetch_all(&self.pool).await
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_async_query!(sqlx::Sqlite);

#[cfg(feature = "postgres")]
impl_async_query!(sqlx::Postgres);

#[cfg(feature = "mysql")]
impl_async_query!(sqlx::MySql);
