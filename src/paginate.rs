//! Paginator - fixed-size, 1-based slicing of a filtered sequence.
//!
//! A [`Page`] is derived, never stored: any change to the sequence, page
//! number or page size means calling [`paginate`] again. Out-of-range page
//! numbers are not clamped here; callers use [`clamp_page`] when a filter
//! change shrinks the page count.

use serde::Serialize;

/// Rows per table page across the dashboard.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a sequence plus the counts needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total_items / page_size)`; zero items means zero pages.
///
/// A `page_size` of zero is treated as one so the count stays defined.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Slice `page` (1-based) out of `items`.
///
/// Page 0 and pages past the end yield empty `items` with correct totals.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);

    let slice: &[T] = if page == 0 || page > total_pages {
        &[]
    } else {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total_items);
        &items[start..end]
    };

    Page {
        items: slice.to_vec(),
        total_items,
        total_pages,
    }
}

/// Bring a page number back into `1..=max(total_pages, 1)`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
