use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Canonical page of a remote listing.
///
/// List endpoints reach callers only in this shape; the raw response may have
/// been a metadata envelope or a bare array (see [`PageEnvelope`]).
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: Option<u64>,
    pub total_pages: Option<u32>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Whether another page should be fetched after `page` (1-based).
    ///
    /// The backend's pagination metadata is not consistently populated, so
    /// every available signal is honored: an explicit next link, a page count,
    /// a total item count, or the current page coming back full-sized. Any one
    /// of them is enough to keep going; a match missed on a later page costs
    /// more than a wasted fetch.
    pub fn has_more(&self, page: u32, page_size: u32) -> bool {
        if self.next.as_deref().is_some_and(|next| !next.is_empty()) {
            return true;
        }
        if let Some(total_pages) = self.total_pages
            && page < total_pages
        {
            return true;
        }
        if let Some(count) = self.count
            && u64::from(page) * u64::from(page_size) < count
        {
            return true;
        }
        self.items.len() as u32 == page_size
    }
}

/// Raw shape of a list response: some endpoints return a metadata envelope,
/// others a bare array. Decoded once here and converted to [`Page`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageEnvelope<T> {
    Keyed {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        total_pages: Option<u32>,
        #[serde(default)]
        next: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> From<PageEnvelope<T>> for Page<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        match envelope {
            PageEnvelope::Keyed {
                results,
                count,
                total_pages,
                next,
            } => Page {
                items: results,
                count,
                total_pages,
                next,
            },
            PageEnvelope::Bare(items) => Page {
                items,
                count: None,
                total_pages: None,
                next: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(len: usize) -> Page<u32> {
        Page {
            items: vec![0; len],
            count: None,
            total_pages: None,
            next: None,
        }
    }

    #[test]
    fn next_link_signals_more() {
        let mut page = page_of(3);
        page.next = Some("/attendees?page=2".to_string());
        assert!(page.has_more(1, 100));
    }

    #[test]
    fn empty_next_link_does_not_signal_more() {
        let mut page = page_of(3);
        page.next = Some(String::new());
        assert!(!page.has_more(1, 100));
    }

    #[test]
    fn total_pages_signals_more() {
        let mut page = page_of(3);
        page.total_pages = Some(4);
        assert!(page.has_more(1, 100));
        assert!(!page.has_more(4, 100));
    }

    #[test]
    fn count_signals_more() {
        let mut page = page_of(100);
        page.count = Some(250);
        assert!(page.has_more(2, 100));
        page.items.truncate(50);
        assert!(!page.has_more(3, 100));
    }

    #[test]
    fn full_page_signals_more_without_metadata() {
        assert!(page_of(100).has_more(1, 100));
        assert!(!page_of(99).has_more(1, 100));
    }

    #[test]
    fn short_page_with_metadata_claiming_more_keeps_going() {
        // Inconsistent backends may return a short page before the last one.
        let mut page = page_of(10);
        page.total_pages = Some(3);
        assert!(page.has_more(1, 100));
    }

    #[test]
    fn envelope_decodes_both_shapes() {
        let keyed: PageEnvelope<u32> =
            serde_json::from_str(r#"{"results":[1,2],"count":2,"total_pages":1,"next":null}"#)
                .expect("keyed");
        let page: Page<u32> = keyed.into();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.count, Some(2));

        let bare: PageEnvelope<u32> = serde_json::from_str("[1,2,3]").expect("bare");
        let page: Page<u32> = bare.into();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.count, None);
    }

    #[test]
    fn envelope_tolerates_missing_metadata() {
        let keyed: PageEnvelope<u32> = serde_json::from_str(r#"{"results":[7]}"#).expect("keyed");
        let page: Page<u32> = keyed.into();
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.total_pages, None);
        assert_eq!(page.next, None);
    }
}
