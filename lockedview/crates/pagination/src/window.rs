//! Page-count math and the page buttons shown by a pagination control.

use crate::PageNumber;

/// Items per page served by the character API.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Pages shown on each side of the current page.
pub const DEFAULT_SIBLING_COUNT: u64 = 1;

/// Number of pages needed to hold `total_count` items.
///
/// A zero `page_size` falls back to [`DEFAULT_PAGE_SIZE`].
///
/// # Examples
///
/// ```
/// use pagination::total_pages;
///
/// assert_eq!(total_pages(826, 20), 42);
/// assert_eq!(total_pages(0, 20), 0);
/// ```
#[must_use]
pub const fn total_pages(total_count: u64, page_size: u64) -> u64 {
    let size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    total_count.div_ceil(size)
}

/// One entry in a rendered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A selectable page.
    Page(u64),
    /// A gap standing in for skipped pages.
    Ellipsis,
}

/// Window of page buttons around the current page.
///
/// The window always shows the first and last page. When the pages do not
/// all fit, the current page and its siblings are shown between them with
/// ellipses marking the gaps, and the number of entries stays constant as
/// the current page moves.
///
/// # Examples
///
/// ```
/// use pagination::{PageItem, PageNumber, PaginationWindow};
///
/// let current = PageNumber::new(5).expect("non-zero");
/// let window = PaginationWindow::new(current, 200);
///
/// assert_eq!(window.total_pages(), 10);
/// assert_eq!(
///     window.items(),
///     vec![
///         PageItem::Page(1),
///         PageItem::Ellipsis,
///         PageItem::Page(4),
///         PageItem::Page(5),
///         PageItem::Page(6),
///         PageItem::Ellipsis,
///         PageItem::Page(10),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    current: PageNumber,
    total_count: u64,
    page_size: u64,
    sibling_count: u64,
}

impl PaginationWindow {
    /// Window for `total_count` items with the default page size and
    /// sibling count.
    #[must_use]
    pub const fn new(current: PageNumber, total_count: u64) -> Self {
        Self {
            current,
            total_count,
            page_size: DEFAULT_PAGE_SIZE,
            sibling_count: DEFAULT_SIBLING_COUNT,
        }
    }

    /// Override the page size; zero keeps the default.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u64) -> Self {
        if page_size != 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Override how many pages flank the current page.
    #[must_use]
    pub const fn with_sibling_count(mut self, sibling_count: u64) -> Self {
        self.sibling_count = sibling_count;
        self
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.page_size)
    }

    /// Whether the control should be rendered at all.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total_pages() > 1
    }

    /// Current page clamped to the available range.
    #[must_use]
    pub fn current(&self) -> u64 {
        match self.total_pages() {
            0 => 1,
            total => self.current.get().min(total),
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current() > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current() < self.total_pages()
    }

    /// Page reached by the "previous" control.
    #[must_use]
    pub fn previous_page(&self) -> Option<PageNumber> {
        if self.has_previous() {
            PageNumber::new(self.current().saturating_sub(1))
        } else {
            None
        }
    }

    /// Page reached by the "next" control.
    #[must_use]
    pub fn next_page(&self) -> Option<PageNumber> {
        if self.has_next() {
            PageNumber::new(self.current().saturating_add(1))
        } else {
            None
        }
    }

    /// Entries to render, in order.
    #[must_use]
    pub fn items(&self) -> Vec<PageItem> {
        let total = self.total_pages();
        let slots = self.sibling_count.saturating_mul(2).saturating_add(5);
        if total <= slots {
            return pages(1, total);
        }

        let current = self.current();
        let left = current.saturating_sub(self.sibling_count).max(1);
        let right = current.saturating_add(self.sibling_count).min(total);
        let gap_before = left > 2;
        let gap_after = right < total.saturating_sub(1);
        // First or last page plus an ellipsis take two of the slots.
        let edge_span = slots.saturating_sub(2);

        let mut items = Vec::with_capacity(usize::try_from(slots).unwrap_or_default());
        match (gap_before, gap_after) {
            (false, true) => {
                items.extend(pages(1, edge_span));
                items.push(PageItem::Ellipsis);
                items.push(PageItem::Page(total));
            }
            (true, false) => {
                items.push(PageItem::Page(1));
                items.push(PageItem::Ellipsis);
                items.extend(pages(total.saturating_sub(edge_span).saturating_add(1), total));
            }
            (true, true) => {
                items.push(PageItem::Page(1));
                items.push(PageItem::Ellipsis);
                items.extend(pages(left, right));
                items.push(PageItem::Ellipsis);
                items.push(PageItem::Page(total));
            }
            (false, false) => items.extend(pages(1, total)),
        }
        items
    }
}

fn pages(first: u64, last: u64) -> Vec<PageItem> {
    (first..=last).map(PageItem::Page).collect()
}
