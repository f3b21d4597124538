use crate::entity::Entity;
use crate::error::SqlxPageResult;
use crate::query::QueryBuilder;
use crate::source::{SqlDialect, SqlxQuery};
use paged_data::{paginate_async, AsyncQuery, PageRequest};
use sqlx::{Database, Pool};
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// A repository over one entity's table.
///
/// Hands out [`SqlxQuery`] sources and pages them. Change tracking and
/// transactions stay with `sqlx` itself.
///
/// # Example
///
/// ```ignore
/// let repo = SqlxRepository::<Post, Sqlite>::new(pool.clone());
/// let page = repo
///     .get_paged_list_with(|q| q.where_eq("author", "alice").order_by("id", true), &request, &cancel)
///     .await?;
/// ```
pub struct SqlxRepository<T, DB: Database> {
    pool: Pool<DB>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, DB: Database> SqlxRepository<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T: Entity, DB: SqlDialect> SqlxRepository<T, DB> {
    /// A query over every row of the entity's table.
    pub fn query(&self) -> SqlxQuery<T, DB> {
        SqlxQuery::for_entity(self.pool.clone())
    }

    /// A query over the rows selected by `f`.
    pub fn query_with(&self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> SqlxQuery<T, DB> {
        self.query().filter(f)
    }

    /// Page through the whole table.
    pub async fn get_paged_list(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> SqlxPageResult<T>
    where
        SqlxQuery<T, DB>: AsyncQuery<T, Error = sqlx::Error>,
    {
        paginate_async(&self.query(), request, cancel).await
    }

    /// Page through the rows selected by `f`.
    pub async fn get_paged_list_with(
        &self,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> SqlxPageResult<T>
    where
        SqlxQuery<T, DB>: AsyncQuery<T, Error = sqlx::Error>,
    {
        let query = self.query_with(f);
        tracing::debug!(
            table = query.builder().table(),
            page_index = request.page_index,
            page_size = request.page_size,
            "paging repository"
        );
        paginate_async(&query, request, cancel).await
    }
}

impl<T, DB: Database> Clone for SqlxRepository<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}
