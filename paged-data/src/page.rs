use crate::error::PageError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Page number of the first page unless a request says otherwise.
pub const DEFAULT_INDEX_FROM: u64 = 1;

/// Page size used by [`PageRequest::default`].
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Pagination parameters, deserializable from query params.
///
/// `page_index` is counted from `index_from`, so with the default origin of
/// `1` the first page is `page_index = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page_index")]
    pub page_index: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default = "default_index_from")]
    pub index_from: u64,
}

fn default_page_index() -> u64 {
    DEFAULT_INDEX_FROM
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_index_from() -> u64 {
    DEFAULT_INDEX_FROM
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_INDEX_FROM,
            page_size: DEFAULT_PAGE_SIZE,
            index_from: DEFAULT_INDEX_FROM,
        }
    }
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size,
            index_from: DEFAULT_INDEX_FROM,
        }
    }

    /// Override the numbering origin of `page_index`.
    pub fn with_index_from(mut self, index_from: u64) -> Self {
        self.index_from = index_from;
        self
    }

    /// Check the request before anything is evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidArgument`] when `index_from > page_index`
    /// or when `page_size` is zero.
    pub fn validate(&self) -> Result<(), PageError> {
        if self.index_from > self.page_index {
            return Err(PageError::invalid_argument(format!(
                "index_from: {} > page_index: {}, must be index_from <= page_index",
                self.index_from, self.page_index
            )));
        }
        if self.page_size == 0 {
            return Err(PageError::invalid_argument(
                "page_size must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Number of items before the first item of this page.
    pub fn offset(&self) -> u64 {
        self.page_index
            .saturating_sub(self.index_from)
            .saturating_mul(self.page_size)
    }
}

/// One page of a larger sequence, with pagination metadata.
///
/// Built once both the total count and the page's items are known; the
/// metadata cannot be changed afterwards. Use [`PagedResult::convert`] or
/// [`PagedResult::map`] to change the item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    page_index: u64,
    page_size: u64,
    index_from: u64,
    total_count: u64,
    total_pages: u64,
    items: Vec<T>,
}

impl<T> PagedResult<T> {
    /// Assemble a page from its items and the source's total count.
    ///
    /// Items past `request.page_size` are dropped.
    pub fn new(mut items: Vec<T>, request: &PageRequest, total_count: u64) -> Self {
        items.truncate(usize::try_from(request.page_size).unwrap_or(usize::MAX));
        Self {
            page_index: request.page_index,
            page_size: request.page_size,
            index_from: request.index_from,
            total_count,
            total_pages: total_pages(total_count, request.page_size),
            items,
        }
    }

    /// A page with no items and all metadata set to zero.
    pub fn empty() -> Self {
        Self {
            page_index: 0,
            page_size: 0,
            index_from: 0,
            total_count: 0,
            total_pages: 0,
            items: Vec::new(),
        }
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn index_from(&self) -> u64 {
        self.index_from
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items on this page (not the total count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index.saturating_sub(self.index_from) > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index
            .saturating_sub(self.index_from)
            .saturating_add(1)
            < self.total_pages
    }

    /// Replace the items with `f(items)`, keeping every piece of metadata.
    ///
    /// `f` is called exactly once with the whole page.
    pub fn convert<U, F, I>(self, f: F) -> PagedResult<U>
    where
        F: FnOnce(Vec<T>) -> I,
        I: IntoIterator<Item = U>,
    {
        PagedResult {
            page_index: self.page_index,
            page_size: self.page_size,
            index_from: self.index_from,
            total_count: self.total_count,
            total_pages: self.total_pages,
            items: f(self.items).into_iter().collect(),
        }
    }

    /// Maps each item to a different type.
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        self.convert(|items| items.into_iter().map(f))
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for PagedResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PagedResult", 8)?;
        state.serialize_field("page_index", &self.page_index)?;
        state.serialize_field("page_size", &self.page_size)?;
        state.serialize_field("index_from", &self.index_from)?;
        state.serialize_field("total_count", &self.total_count)?;
        state.serialize_field("total_pages", &self.total_pages)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("has_previous_page", &self.has_previous_page())?;
        state.serialize_field("has_next_page", &self.has_next_page())?;
        state.end()
    }
}

fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    }
}
