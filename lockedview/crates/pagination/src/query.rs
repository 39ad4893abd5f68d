//! Mapping between the `pageNumber` query parameter and a page number.
//!
//! Query strings use `application/x-www-form-urlencoded` encoding. Reads
//! decode keys and values; writes only touch `pageNumber` pairs and keep
//! every other pair byte-for-byte in its original position.

use std::borrow::Cow;
use std::fmt;
use std::num::NonZeroU64;

use url::form_urlencoded;

/// Query parameter carrying the current page.
pub const PAGE_NUMBER_KEY: &str = "pageNumber";

/// A 1-based page number.
///
/// # Examples
///
/// ```
/// use pagination::PageNumber;
///
/// assert_eq!(PageNumber::default(), PageNumber::FIRST);
/// assert_eq!(PageNumber::new(4).map(PageNumber::get), Some(4));
/// assert!(PageNumber::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU64);

impl PageNumber {
    /// The default page.
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    /// Build a page number, rejecting zero.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        match NonZeroU64::new(value) {
            Some(page) => Some(Self(page)),
            None => None,
        }
    }

    /// The page as a plain integer.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Parse a raw query value, falling back to [`PageNumber::FIRST`].
    ///
    /// Only plain ASCII digit strings are accepted: signs, whitespace,
    /// fractions and values that overflow `u64` all collapse to the default,
    /// as does zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::parse_or_first("12").get(), 12);
    /// assert_eq!(PageNumber::parse_or_first("-3").get(), 1);
    /// assert_eq!(PageNumber::parse_or_first("2.5").get(), 1);
    /// ```
    #[must_use]
    pub fn parse_or_first(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Self::FIRST)
    }

    fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        raw.parse::<u64>().ok().and_then(Self::new)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl From<PageNumber> for u64 {
    fn from(value: PageNumber) -> Self {
        value.get()
    }
}

/// Derive the current page from a raw query string.
///
/// The first `pageNumber` pair wins. A leading `?` is ignored. Missing,
/// malformed, zero and negative values all yield page 1; there is no upper
/// bound.
///
/// # Examples
///
/// ```
/// use pagination::current_page;
///
/// assert_eq!(current_page("").get(), 1);
/// assert_eq!(current_page("pageNumber=5").get(), 5);
/// assert_eq!(current_page("?pageNumber=0").get(), 1);
/// assert_eq!(current_page("pageNumber=abc").get(), 1);
/// ```
#[must_use]
pub fn current_page(raw_query: &str) -> PageNumber {
    segments(raw_query)
        .filter_map(decode_segment)
        .find(|(key, _)| key == PAGE_NUMBER_KEY)
        .map_or(PageNumber::FIRST, |(_, value)| {
            PageNumber::parse_or_first(&value)
        })
}

/// Produce a new query string with `pageNumber` set to `new_page`.
///
/// When `new_page` renders as `""` or `"1"` every `pageNumber` pair is
/// removed, so the default page never appears in the canonical form.
/// Otherwise the first `pageNumber` pair is rewritten in place (later
/// duplicates are dropped) or, if there was none, appended. Every other pair
/// keeps its original text and relative order. Empty segments are dropped
/// and the result never starts with `?`.
///
/// # Examples
///
/// ```
/// use pagination::with_updated_page;
///
/// assert_eq!(with_updated_page("foo=bar", 1), "foo=bar");
/// assert_eq!(with_updated_page("foo=bar&pageNumber=2", 1), "foo=bar");
/// assert_eq!(with_updated_page("", 5), "pageNumber=5");
/// assert_eq!(with_updated_page("pageNumber=2&foo=bar", "7"), "pageNumber=7&foo=bar");
/// ```
#[must_use]
pub fn with_updated_page(raw_query: &str, new_page: impl fmt::Display) -> String {
    let value = new_page.to_string();
    let replacement = (!value.is_empty() && value != "1").then(|| encode_pair(&value));

    let mut kept: Vec<&str> = Vec::new();
    let mut written = false;
    for segment in segments(raw_query) {
        if !is_page_segment(segment) {
            kept.push(segment);
            continue;
        }
        if let Some(pair) = replacement.as_deref().filter(|_| !written) {
            kept.push(pair);
            written = true;
        }
    }
    if let Some(pair) = replacement.as_deref().filter(|_| !written) {
        kept.push(pair);
    }

    kept.join("&")
}

/// Requested change to the page query, mirroring a `setQuery({ pageNumber })`
/// call. A `None` page leaves the query untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUpdate {
    /// New page value as it would be written to the URL.
    pub page_number: Option<String>,
}

impl QueryUpdate {
    /// Update targeting the given page.
    #[must_use]
    pub fn page(page: impl fmt::Display) -> Self {
        Self {
            page_number: Some(page.to_string()),
        }
    }
}

/// Page state backed by a query string.
///
/// The wrapped query is the canonical source of truth; the page number is
/// recomputed on every call to [`PageQueryState::page_number`].
///
/// # Examples
///
/// ```
/// use pagination::{PageQueryState, QueryUpdate};
///
/// let mut state = PageQueryState::from_query("?pageNumber=3");
/// assert_eq!(state.page_number().get(), 3);
///
/// state.set_query(QueryUpdate::page(1));
/// assert_eq!(state.query(), "");
/// assert_eq!(state.page_number().get(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQueryState {
    query: String,
}

impl PageQueryState {
    /// Wrap a raw query string, with or without a leading `?`.
    #[must_use]
    pub fn from_query(raw_query: &str) -> Self {
        Self {
            query: segments(raw_query).collect::<Vec<_>>().join("&"),
        }
    }

    /// Current page derived from the query.
    #[must_use]
    pub fn page_number(&self) -> PageNumber {
        current_page(&self.query)
    }

    /// Current query string, without a leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Location suffix suitable for pushing onto the browser history.
    #[must_use]
    pub fn href(&self) -> String {
        format!("?{}", self.query)
    }

    /// Apply an update and return the new query string.
    pub fn set_query(&mut self, update: QueryUpdate) -> &str {
        if let Some(page) = update.page_number {
            self.query = with_updated_page(&self.query, page);
        }
        &self.query
    }
}

fn segments(raw_query: &str) -> impl Iterator<Item = &str> {
    raw_query
        .strip_prefix('?')
        .unwrap_or(raw_query)
        .split('&')
        .filter(|segment| !segment.is_empty())
}

fn decode_segment(segment: &str) -> Option<(Cow<'_, str>, Cow<'_, str>)> {
    form_urlencoded::parse(segment.as_bytes()).next()
}

fn is_page_segment(segment: &str) -> bool {
    decode_segment(segment).is_some_and(|(key, _)| key == PAGE_NUMBER_KEY)
}

fn encode_pair(value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(PAGE_NUMBER_KEY, value)
        .finish()
}
