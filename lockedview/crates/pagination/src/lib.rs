//! Page-number query state and pagination window primitives.
//!
//! The character directory keeps its current page in the `pageNumber` query
//! parameter. The query string is the only source of truth: the page number
//! is derived from it on every read, and updates produce a new canonical
//! query string in which the default page is omitted.
//!
//! # Overview
//!
//! - [`current_page`] and [`with_updated_page`] are the two pure functions
//!   over raw query strings.
//! - [`PageQueryState`] wraps a query string and exposes the
//!   `page_number` / `set_query` surface a UI shell consumes.
//! - [`PaginationWindow`] computes page counts and the page buttons a
//!   pagination control renders.
//! - [`PageInfo`] decodes the `{count, next, pages, prev}` envelope returned
//!   by the character API.
//!
//! # Example
//!
//! ```
//! use pagination::{current_page, with_updated_page};
//!
//! let query = with_updated_page("sort=name&pageNumber=3", 1);
//! assert_eq!(query, "sort=name");
//! assert_eq!(current_page(&query).get(), 1);
//! ```

mod info;
mod query;
mod window;

pub use info::{PageInfo, PageInfoError};
pub use query::{
    PAGE_NUMBER_KEY, PageNumber, PageQueryState, QueryUpdate, current_page, with_updated_page,
};
pub use window::{
    DEFAULT_PAGE_SIZE, DEFAULT_SIBLING_COUNT, PageItem, PaginationWindow, total_pages,
};
