//! # paged-data — paged results over in-memory and query-backed sources
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PagedResult`] | One page of a larger sequence plus its metadata |
//! | [`PageRequest`] | Page index, page size, and index origin |
//! | [`PageSource`] | Anything a page can be cut from (collections, `&impl Query`) |
//! | [`Query`] / [`AsyncQuery`] | Deferred sources that count and slice themselves |
//! | [`PageError`] | Invalid request, cancellation, or the source's own error |
//! | [`PagingConfig`] | Page size defaults loaded from YAML / env |
//!
//! ```ignore
//! use paged_data::prelude::*;
//!
//! let page = paginate((1..=25).collect::<Vec<_>>(), &PageRequest::new(3, 10))?;
//! assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
//! assert!(!page.has_next_page());
//! ```

pub mod config;
pub mod error;
pub mod page;
pub mod paginate;
pub mod source;

pub use config::{ConfigError, PagingConfig};
pub use error::PageError;
pub use page::{PageRequest, PagedResult, DEFAULT_INDEX_FROM, DEFAULT_PAGE_SIZE};
pub use paginate::{
    convert, empty, paginate, paginate_async, paginate_convert, paginate_convert_async, Paginate,
};
pub use source::{AsyncQuery, InMemory, PageSource, Query};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        paginate, paginate_async, paginate_convert, AsyncQuery, InMemory, PageError, PageRequest,
        PageSource, PagedResult, Paginate, Query,
    };
}
