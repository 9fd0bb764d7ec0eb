//! The paginated response envelope and its client-side form.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::FIRST_PAGE;

/// The envelope every paginated endpoint returns:
/// `{ <items>: T[], total, pages, page }`.
///
/// The item key differs per endpoint (`users`, `publications`, `follows`);
/// all of them decode into [`PageEnvelope::items`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PageEnvelope<T> {
    /// Items of this page, in server order.
    #[serde(alias = "users", alias = "publications", alias = "follows", default = "Vec::new")]
    pub items: Vec<T>,
    /// Size of the whole collection.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
    /// Number of pages in the collection.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub pages: u32,
    /// The page this envelope holds, 1-based.
    #[serde(default = "first_page", deserialize_with = "lenient_u32")]
    pub page: u32,
}

/// One page of a remote collection.
///
/// Invariant: `1 <= current_page <= total_pages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// The page these items belong to.
    pub current_page: u32,
    /// Number of pages the server reports.
    pub total_pages: u32,
    /// Size of the whole collection.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Build a page, normalizing cursors so the invariant holds.
    ///
    /// Servers report `pages = 0` for an empty collection; that becomes one
    /// (empty) page.
    pub fn new(items: Vec<T>, current_page: u32, total_pages: u32, total_count: u64) -> Self {
        let current_page = current_page.max(FIRST_PAGE);
        Self {
            items,
            current_page,
            total_pages: total_pages.max(current_page),
            total_count,
        }
    }

    /// Map the items, keeping cursors.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }
}

impl<T> From<PageEnvelope<T>> for Page<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        Page::new(envelope.items, envelope.page, envelope.pages, envelope.total)
    }
}

fn first_page() -> u32 {
    FIRST_PAGE
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = lenient_u64(deserializer)?;
    u32::try_from(n).map_err(serde::de::Error::custom)
}
