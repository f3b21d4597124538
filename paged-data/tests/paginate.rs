use paged_data::{
    convert, empty, paginate, paginate_convert, InMemory, PageError, PageRequest, PagedResult,
    Paginate, Query,
};
use std::cell::Cell;

fn elements() -> Vec<u32> {
    (0..25).collect()
}

/// Deferred source that records how often it is evaluated.
struct CountingQuery {
    data: Vec<u32>,
    counts: Cell<usize>,
    fetches: Cell<usize>,
}

impl CountingQuery {
    fn new(data: Vec<u32>) -> Self {
        Self {
            data,
            counts: Cell::new(0),
            fetches: Cell::new(0),
        }
    }
}

impl Query<u32> for CountingQuery {
    type Error = String;

    fn count(&self) -> Result<u64, String> {
        self.counts.set(self.counts.get() + 1);
        Ok(self.data.len() as u64)
    }

    fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<u32>, String> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self
            .data
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .copied()
            .collect())
    }
}

struct BrokenQuery;

impl Query<u32> for BrokenQuery {
    type Error = std::io::Error;

    fn count(&self) -> Result<u64, Self::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "gone"))
    }

    fn fetch(&self, _offset: u64, _limit: u64) -> Result<Vec<u32>, Self::Error> {
        panic!("fetch must not run after a failed count");
    }
}

#[test]
fn test_first_page() {
    let page = paginate(elements(), &PageRequest::new(1, 10)).unwrap();
    assert_eq!(page.items(), &elements()[0..10]);
    assert_eq!(page.total_count(), 25);
    assert_eq!(page.total_pages(), 3);
    assert!(!page.has_previous_page());
    assert!(page.has_next_page());
}

#[test]
fn test_last_partial_page() {
    let page = paginate(elements(), &PageRequest::new(3, 10)).unwrap();
    assert_eq!(page.items(), &elements()[20..25]);
    assert_eq!(page.len(), 5);
    assert!(page.has_previous_page());
    assert!(!page.has_next_page());
}

#[test]
fn test_page_past_the_end_is_empty() {
    let page = paginate(elements(), &PageRequest::new(4, 10)).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count(), 25);
    assert_eq!(page.total_pages(), 3);
    assert!(page.has_previous_page());
    assert!(!page.has_next_page());
}

#[test]
fn test_zero_based_origin() {
    let request = PageRequest::new(0, 10).with_index_from(0);
    let page = paginate(elements(), &request).unwrap();
    assert_eq!(page.items(), &elements()[0..10]);
    assert_eq!(page.index_from(), 0);
    assert!(!page.has_previous_page());

    let request = PageRequest::new(2, 10).with_index_from(0);
    let page = paginate(elements(), &request).unwrap();
    assert_eq!(page.items(), &elements()[20..25]);
    assert!(!page.has_next_page());
}

#[test]
fn test_origin_after_index_is_rejected() {
    let request = PageRequest::new(1, 10).with_index_from(2);
    let err = paginate(elements(), &request).unwrap_err();
    match err {
        PageError::InvalidArgument(msg) => {
            assert!(msg.contains('2'));
            assert!(msg.contains('1'));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_request_does_not_evaluate_source() {
    let query = CountingQuery::new(elements());
    let request = PageRequest::new(3, 10).with_index_from(5);
    assert!(matches!(
        paginate(&query, &request),
        Err(PageError::InvalidArgument(_))
    ));
    assert_eq!(query.counts.get(), 0);
    assert_eq!(query.fetches.get(), 0);
}

#[test]
fn test_deferred_source_is_evaluated_once_each() {
    let query = CountingQuery::new(elements());
    let page = paginate(&query, &PageRequest::new(2, 10)).unwrap();
    assert_eq!(page.items(), &elements()[10..20]);
    assert_eq!(page.total_count(), 25);
    assert_eq!(query.counts.get(), 1);
    assert_eq!(query.fetches.get(), 1);
}

#[test]
fn test_source_error_is_propagated_unchanged() {
    let err = paginate(&BrokenQuery, &PageRequest::new(1, 10)).unwrap_err();
    let io = err.into_source().expect("source error");
    assert_eq!(io.kind(), std::io::ErrorKind::ConnectionReset);
    assert_eq!(io.to_string(), "gone");
}

#[test]
fn test_iterator_and_slice_sources() {
    let page = paginate(InMemory(0u32..25), &PageRequest::new(2, 10)).unwrap();
    assert_eq!(page.items(), &elements()[10..20]);

    let data = elements();
    let page = paginate(data.as_slice(), &PageRequest::new(3, 10)).unwrap();
    assert_eq!(page.items(), &data[20..25]);
    // the borrowed source is left intact
    assert_eq!(data.len(), 25);
}

#[test]
fn test_item_count_matches_formula() {
    for total in [0u64, 1, 9, 10, 11, 25, 30] {
        let data: Vec<u64> = (0..total).collect();
        for page_size in 1..=12u64 {
            for page_index in 1..=5u64 {
                let request = PageRequest::new(page_index, page_size);
                let page = paginate(data.clone(), &request).unwrap();
                let offset = (page_index - 1) * page_size;
                let expected = page_size.min(total.saturating_sub(offset));
                assert_eq!(page.len() as u64, expected);
                assert_eq!(page.total_pages(), total.div_ceil(page_size));
                assert_eq!(page.has_previous_page(), page_index > 1);
                assert_eq!(page.has_next_page(), page_index < page.total_pages());
            }
        }
    }
}

#[test]
fn test_repaginating_a_page_is_a_no_op() {
    let request = PageRequest::new(1, 10);
    let page = paginate(elements(), &request).unwrap();
    let again = paginate(page.items().to_vec(), &request).unwrap();
    assert_eq!(again.items(), page.items());
}

#[test]
fn test_paginate_convert_converts_only_the_page() {
    let seen = Cell::new(0usize);
    let page = paginate_convert(
        elements(),
        |items: Vec<u32>| {
            seen.set(items.len());
            items.into_iter().map(|i| format!("#{i}"))
        },
        &PageRequest::new(3, 10),
    )
    .unwrap();
    assert_eq!(seen.get(), 5);
    assert_eq!(page.items()[0], "#20");
    assert_eq!(page.total_count(), 25);
    assert_eq!(page.index_from(), 1);
    assert_eq!(page.total_pages(), 3);
}

#[test]
fn test_convert_preserves_metadata() {
    let original = paginate(elements(), &PageRequest::new(2, 7)).unwrap();
    let converted: PagedResult<String> =
        convert(original.clone(), |items| items.into_iter().map(|i| i.to_string()));
    assert_eq!(converted.page_index(), original.page_index());
    assert_eq!(converted.page_size(), original.page_size());
    assert_eq!(converted.index_from(), original.index_from());
    assert_eq!(converted.total_count(), original.total_count());
    assert_eq!(converted.total_pages(), original.total_pages());
    assert_eq!(converted.len(), original.len());
}

#[test]
fn test_empty_helper() {
    let page: PagedResult<u32> = empty();
    assert_eq!(page.total_count(), 0);
    assert_eq!(page.total_pages(), 0);
    assert!(page.items().is_empty());
}

#[test]
fn test_extension_methods() {
    let page = elements().into_paged(&PageRequest::new(2, 10)).unwrap();
    assert_eq!(page.items()[0], 10);

    let query = CountingQuery::new(elements());
    let page = (&query)
        .into_paged_with(
            |items: Vec<u32>| items.into_iter().map(u64::from),
            &PageRequest::new(1, 3),
        )
        .unwrap();
    assert_eq!(page.into_items(), vec![0u64, 1, 2]);
    assert_eq!(query.fetches.get(), 1);
}
