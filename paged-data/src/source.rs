//! Sources a page can be computed from.
//!
//! Sources come in two kinds:
//!
//! - **materialized**: [`Vec<T>`] or any iterator wrapped in [`InMemory`].
//!   The whole sequence is evaluated, then counted and sliced in memory.
//! - **deferred**: anything implementing [`Query`] (or [`AsyncQuery`] for the
//!   async path). Counting and slicing are pushed down to the query, so a
//!   page costs one `count` and one `fetch` evaluation.
//!
//! The kind is picked statically through [`PageSource`]; a borrowed query
//! (`&Q`) is a deferred source, an owned collection is a materialized one.

use std::convert::Infallible;
use std::future::Future;

/// Something a page can be cut from.
pub trait PageSource<T> {
    type Error;

    /// Count the whole source and return it together with up to `limit`
    /// items starting at `offset`.
    fn load(self, offset: u64, limit: u64) -> Result<(u64, Vec<T>), Self::Error>;
}

/// A deferred source that can count itself and return a slice of itself.
///
/// # Example
///
/// ```ignore
/// impl Query<User> for UserTable {
///     type Error = DbError;
///     fn count(&self) -> Result<u64, DbError> { self.db.count("users") }
///     fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<User>, DbError> {
///         self.db.select("users", offset, limit)
///     }
/// }
/// ```
pub trait Query<T> {
    type Error;

    fn count(&self) -> Result<u64, Self::Error>;
    fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, Self::Error>;
}

/// Async counterpart of [`Query`], for sources evaluated remotely.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
pub trait AsyncQuery<T>: Send + Sync {
    type Error: Send;

    fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;
    fn fetch(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<T>, Self::Error>> + Send;
}

/// Marks an iterable as a materialized source.
///
/// ```ignore
/// let page = paginate(InMemory(1..=25), &PageRequest::new(2, 10))?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemory<I>(pub I);

impl<T, I> PageSource<T> for InMemory<I>
where
    I: IntoIterator<Item = T>,
{
    type Error = Infallible;

    fn load(self, offset: u64, limit: u64) -> Result<(u64, Vec<T>), Self::Error> {
        let all: Vec<T> = self.0.into_iter().collect();
        PageSource::<T>::load(all, offset, limit)
    }
}

impl<T> PageSource<T> for Vec<T> {
    type Error = Infallible;

    fn load(mut self, offset: u64, limit: u64) -> Result<(u64, Vec<T>), Self::Error> {
        let total = self.len() as u64;
        let (start, end) = bounds(self.len(), offset, limit);
        let items = self.drain(start..end).collect();
        Ok((total, items))
    }
}

impl<T, Q> PageSource<T> for &Q
where
    Q: Query<T> + ?Sized,
{
    type Error = Q::Error;

    fn load(self, offset: u64, limit: u64) -> Result<(u64, Vec<T>), Self::Error> {
        let total = self.count()?;
        let items = self.fetch(offset, limit)?;
        Ok((total, items))
    }
}

impl<T: Clone> Query<T> for [T] {
    type Error = Infallible;

    fn count(&self) -> Result<u64, Self::Error> {
        Ok(self.len() as u64)
    }

    fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, Self::Error> {
        let (start, end) = bounds(self.len(), offset, limit);
        Ok(self[start..end].to_vec())
    }
}

impl<T: Clone> Query<T> for Vec<T> {
    type Error = Infallible;

    fn count(&self) -> Result<u64, Self::Error> {
        Query::count(self.as_slice())
    }

    fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, Self::Error> {
        Query::fetch(self.as_slice(), offset, limit)
    }
}

impl<T: Clone + Send + Sync> AsyncQuery<T> for Vec<T> {
    type Error = Infallible;

    async fn count(&self) -> Result<u64, Self::Error> {
        Query::count(self.as_slice())
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, Self::Error> {
        Query::fetch(self.as_slice(), offset, limit)
    }
}

/// Clamp `[offset, offset + limit)` to a sequence of length `len`.
fn bounds(len: usize, offset: u64, limit: u64) -> (usize, usize) {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(len);
    (start, end)
}
