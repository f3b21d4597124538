use crate::query::QueryError;
use paged_data::{PageError, PagedResult};

/// Extension trait for lifting `sqlx::Error` into `PageError`.
///
/// The driver error is carried unchanged in [`PageError::Source`].
pub trait SqlxErrorExt {
    fn into_page_error(self) -> PageError<sqlx::Error>;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_page_error(self) -> PageError<sqlx::Error> {
        PageError::Source(self)
    }
}

/// A statement that could not be built never reaches the driver; it is
/// reported as a configuration error.
impl From<QueryError> for sqlx::Error {
    fn from(err: QueryError) -> Self {
        sqlx::Error::Configuration(Box::new(err))
    }
}

/// Convenience alias for paged reads through `sqlx`.
pub type SqlxPageResult<T> = Result<PagedResult<T>, PageError<sqlx::Error>>;
