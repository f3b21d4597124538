use crate::error::PageError;
use crate::page::{PageRequest, PagedResult};
use crate::source::{AsyncQuery, PageSource};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Compute one page of `source`.
///
/// Materialized sources are counted and sliced in memory; deferred sources
/// (`&impl Query<T>`) get exactly one `count` and one `fetch` call.
/// A page past the end of the source has no items but valid metadata.
///
/// # Errors
///
/// [`PageError::InvalidArgument`] when the request is invalid (nothing is
/// evaluated), or [`PageError::Source`] carrying the source's own error.
///
/// # Example
///
/// ```ignore
/// let page = paginate(users, &PageRequest::new(2, 10))?;
/// assert!(page.has_previous_page());
/// ```
pub fn paginate<T, S>(
    source: S,
    request: &PageRequest,
) -> Result<PagedResult<T>, PageError<S::Error>>
where
    S: PageSource<T>,
{
    check(request)?;
    let offset = request.offset();
    let (total_count, items) = source
        .load(offset, request.page_size)
        .map_err(PageError::Source)?;
    Ok(assemble(items, request, offset, total_count))
}

/// Like [`paginate`], then hands the extracted items to `convert` once.
///
/// Only the page's items are converted, never the whole source.
pub fn paginate_convert<T, U, S, F, I>(
    source: S,
    convert: F,
    request: &PageRequest,
) -> Result<PagedResult<U>, PageError<S::Error>>
where
    S: PageSource<T>,
    F: FnOnce(Vec<T>) -> I,
    I: IntoIterator<Item = U>,
{
    paginate(source, request).map(|page| page.convert(convert))
}

/// Compute one page of an async source, counting first and fetching second.
///
/// `cancel` is checked before each of the two evaluations and raced against
/// them while they run. Once it fires no further evaluation is started and
/// anything already produced is discarded.
///
/// The count and the items come from two separate evaluations, so unless the
/// source reads from a consistent snapshot the count may be stale relative
/// to the items under concurrent writes.
///
/// # Errors
///
/// [`PageError::InvalidArgument`], [`PageError::Cancelled`], or
/// [`PageError::Source`] carrying the source's own error.
pub async fn paginate_async<T, Q>(
    source: &Q,
    request: &PageRequest,
    cancel: &CancellationToken,
) -> Result<PagedResult<T>, PageError<Q::Error>>
where
    Q: AsyncQuery<T> + ?Sized,
{
    check(request)?;
    let offset = request.offset();
    let total_count = evaluate(cancel, || source.count()).await?;
    let items = evaluate(cancel, || source.fetch(offset, request.page_size)).await?;
    Ok(assemble(items, request, offset, total_count))
}

/// Like [`paginate_async`], then hands the fetched items to `convert` once.
pub async fn paginate_convert_async<T, U, Q, F, I>(
    source: &Q,
    convert: F,
    request: &PageRequest,
    cancel: &CancellationToken,
) -> Result<PagedResult<U>, PageError<Q::Error>>
where
    Q: AsyncQuery<T> + ?Sized,
    F: FnOnce(Vec<T>) -> I,
    I: IntoIterator<Item = U>,
{
    paginate_async(source, request, cancel)
        .await
        .map(|page| page.convert(convert))
}

/// Convert an already computed page without re-querying its source.
pub fn convert<T, U, F, I>(existing: PagedResult<T>, f: F) -> PagedResult<U>
where
    F: FnOnce(Vec<T>) -> I,
    I: IntoIterator<Item = U>,
{
    existing.convert(f)
}

/// A page with no items and zeroed metadata, for when no query was needed.
pub fn empty<T>() -> PagedResult<T> {
    PagedResult::empty()
}

/// Extension methods for paging any [`PageSource`] in place.
///
/// ```ignore
/// let page = users.into_paged(&PageRequest::new(1, 20))?;
/// let views = (&query).into_paged_with(|rows| rows.into_iter().map(View::from), &request)?;
/// ```
pub trait Paginate<T>: PageSource<T> + Sized {
    fn into_paged(self, request: &PageRequest) -> Result<PagedResult<T>, PageError<Self::Error>> {
        paginate(self, request)
    }

    fn into_paged_with<U, F, I>(
        self,
        convert: F,
        request: &PageRequest,
    ) -> Result<PagedResult<U>, PageError<Self::Error>>
    where
        F: FnOnce(Vec<T>) -> I,
        I: IntoIterator<Item = U>,
    {
        paginate_convert(self, convert, request)
    }
}

impl<T, S: PageSource<T>> Paginate<T> for S {}

fn check<E>(request: &PageRequest) -> Result<(), PageError<E>> {
    request.validate().map_err(|err| {
        tracing::debug!(
            page_index = request.page_index,
            page_size = request.page_size,
            index_from = request.index_from,
            error = %err,
            "rejected page request"
        );
        err.widen()
    })
}

fn assemble<T>(
    items: Vec<T>,
    request: &PageRequest,
    offset: u64,
    total_count: u64,
) -> PagedResult<T> {
    tracing::debug!(
        page_index = request.page_index,
        page_size = request.page_size,
        offset,
        total_count,
        items = items.len(),
        "computed page"
    );
    PagedResult::new(items, request, total_count)
}

/// Run one evaluation of an async source unless `cancel` has fired.
async fn evaluate<V, E, F, Fut>(
    cancel: &CancellationToken,
    evaluation: F,
) -> Result<V, PageError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if cancel.is_cancelled() {
        tracing::debug!("pagination cancelled before evaluation");
        return Err(PageError::Cancelled);
    }
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = evaluation() => Some(result),
    };
    match result {
        Some(result) if !cancel.is_cancelled() => result.map_err(PageError::Source),
        _ => {
            tracing::debug!("pagination cancelled during evaluation");
            Err(PageError::Cancelled)
        }
    }
}
