//! Pagination envelope returned alongside each page of characters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PageNumber, PaginationWindow};

/// Errors raised while decoding a [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageInfoError {
    /// The payload is not valid JSON or lacks required fields.
    #[error("invalid page info JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
    /// A neighbouring page lies outside `1..=pages`.
    #[error("{field} page {page} is outside 1..={pages}")]
    NeighbourOutOfRange {
        /// Which neighbour was out of range (`next` or `prev`).
        field: &'static str,
        /// The offending page number.
        page: u64,
        /// Total pages reported by the same envelope.
        pages: u64,
    },
}

/// Pagination envelope for one page of results.
///
/// Serialised as `{"count": .., "pages": .., "next": .., "prev": ..}`, with
/// `null` neighbours at either end of the range.
///
/// # Examples
///
/// ```
/// use pagination::PageInfo;
///
/// let info = PageInfo::from_json(r#"{"count": 826, "pages": 42, "next": 2, "prev": null}"#)
///     .expect("valid info");
/// assert_eq!(info.pages, 42);
/// assert!(info.prev.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of items across all pages.
    pub count: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Following page, if any.
    pub next: Option<u64>,
    /// Preceding page, if any.
    pub prev: Option<u64>,
}

impl PageInfo {
    /// Decode and validate an envelope from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PageInfoError::Parse`] for malformed JSON and
    /// [`PageInfoError::NeighbourOutOfRange`] when `next` or `prev` do not
    /// name a page within the reported range.
    pub fn from_json(json: &str) -> Result<Self, PageInfoError> {
        let info: Self = serde_json::from_str(json).map_err(|err| PageInfoError::Parse {
            message: err.to_string(),
        })?;
        info.validate()
    }

    /// Pagination window for this envelope with the current page selected.
    #[must_use]
    pub const fn window(&self, current: PageNumber) -> PaginationWindow {
        PaginationWindow::new(current, self.count)
    }

    fn validate(self) -> Result<Self, PageInfoError> {
        for (field, neighbour) in [("next", self.next), ("prev", self.prev)] {
            if let Some(page) = neighbour.filter(|page| *page == 0 || *page > self.pages) {
                return Err(PageInfoError::NeighbourOutOfRange {
                    field,
                    page,
                    pages: self.pages,
                });
            }
        }
        Ok(self)
    }
}
