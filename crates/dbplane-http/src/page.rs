//! Paginated list envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{results, totalCount, links}` envelope both APIs wrap lists in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of items across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    /// Hypermedia links, passed through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Value>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total_count: None,
            links: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Wrap a list of items.
    #[must_use]
    pub fn new(results: Vec<T>) -> Self {
        let total_count = Some(results.len() as u64);
        Self {
            results,
            total_count,
            links: Vec::new(),
        }
    }

    /// Transform every item, keeping the envelope.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
            total_count: self.total_count,
            links: self.links,
        })
    }
}
