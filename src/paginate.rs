//! Offset/limit pagination over listing operations.
//!
//! A page strictly shorter than the requested limit (or empty) signals
//! exhaustion; items accumulate in server-provided order with no re-sorting
//! and no deduplication. A hard page cap bounds the loop against a
//! misbehaving endpoint that keeps returning full pages.

use std::future::Future;

use crate::error::{AdapterError, AdapterResult};

/// One page of a listing read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// True when this page ends the listing.
    pub exhausted: bool,
}

impl<T> Page<T> {
    /// Classify a returned page against the limit it was requested with.
    pub fn new(items: Vec<T>, limit: u32) -> Self {
        let exhausted = (items.len() as u64) < u64::from(limit);
        Self { items, exhausted }
    }
}

/// Read every page of a listing, invoking `fetch(offset)` with increasing
/// offsets until exhaustion.
///
/// Page failures propagate as typed errors; more than `max_pages` full pages
/// fail with `TooManyPages`.
pub async fn read_all<T, F, Fut>(limit: u32, max_pages: u32, mut fetch: F) -> AdapterResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AdapterResult<Vec<T>>>,
{
    if limit == 0 {
        return Err(AdapterError::OutOfRange {
            field: "limit".to_string(),
            value: "0".to_string(),
        });
    }

    let mut items = Vec::new();
    let mut offset = 0u32;
    let mut pages = 0u32;
    loop {
        if pages == max_pages {
            tracing::warn!(max_pages, collected = items.len(), "pagination cap reached");
            return Err(AdapterError::TooManyPages { max_pages });
        }
        let page = Page::new(fetch(offset).await?, limit);
        pages += 1;
        let exhausted = page.exhausted;
        items.extend(page.items);
        if exhausted {
            break;
        }
        offset = offset.saturating_add(limit);
    }
    Ok(items)
}
