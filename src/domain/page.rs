use serde::{Deserialize, Serialize};

/// Number of items the backend returns per page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// Paginated list envelope `{count, next, previous, results}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap a full in-memory list as a single page.
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            next: None,
            previous: None,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Total number of pages for `count` items.
    pub fn total_pages(&self) -> usize {
        self.count.div_ceil(DEFAULT_ITEMS_PER_PAGE).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: usize, results: usize) -> Page<u8> {
        Page {
            count,
            next: None,
            previous: None,
            results: vec![0; results],
        }
    }

    #[test]
    fn one_item_past_a_full_page_adds_a_page() {
        let mut first = page(13, DEFAULT_ITEMS_PER_PAGE);
        first.next = Some("http://localhost:8000/api/videos/?page=2".into());
        assert_eq!(first.total_pages(), 2);
    }

    #[test]
    fn full_page_is_a_single_page() {
        assert_eq!(page(12, 12).total_pages(), 1);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        assert_eq!(page(0, 0).total_pages(), 1);
        assert_eq!(Page::<u8>::single(vec![]).total_pages(), 1);
    }
}
