use std::convert::Infallible;

/// Errors that can occur while computing a page.
///
/// `E` is the error type of the underlying source. It is carried unchanged
/// in [`PageError::Source`]; in-memory sources use [`Infallible`].
#[derive(Debug)]
pub enum PageError<E = Infallible> {
    /// The paging parameters were rejected before any evaluation.
    InvalidArgument(String),
    /// The cancellation signal fired before the page was complete.
    Cancelled,
    /// The source failed while counting or fetching.
    Source(E),
}

impl<E> PageError<E> {
    /// Construct an `InvalidArgument` variant from any message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        PageError::InvalidArgument(msg.into())
    }

    /// Convert the carried source error, leaving the other variants as-is.
    pub fn map_source<F, E2>(self, f: F) -> PageError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            PageError::InvalidArgument(msg) => PageError::InvalidArgument(msg),
            PageError::Cancelled => PageError::Cancelled,
            PageError::Source(err) => PageError::Source(f(err)),
        }
    }

    /// Returns the source error, if this is a `Source` variant.
    pub fn into_source(self) -> Option<E> {
        match self {
            PageError::Source(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PageError::Cancelled)
    }
}

impl PageError<Infallible> {
    /// Widen an error from an infallible source into any source error type.
    pub fn widen<E>(self) -> PageError<E> {
        self.map_source(|never| match never {})
    }
}

impl<E: std::fmt::Display> std::fmt::Display for PageError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            PageError::Cancelled => write!(f, "Pagination cancelled"),
            PageError::Source(err) => write!(f, "Source error: {err}"),
        }
    }
}

impl<E> std::error::Error for PageError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageError::Source(err) => Some(err),
            _ => None,
        }
    }
}
