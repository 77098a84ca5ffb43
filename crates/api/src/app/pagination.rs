//! Zero-based page/size pagination with optional `sort=field,dir`.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Option<String>,
}

/// Page descriptor echoed back in the response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub page: usize,
    pub size: usize,
    #[serde(rename = "totalElements")]
    pub total_elements: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
}

pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl PageQuery {
    /// Parsed `sort` parameter. Direction defaults to ascending; anything
    /// other than `desc` is treated as ascending.
    pub fn sort(&self) -> Option<Sort> {
        let raw = self.sort.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let (field, dir) = match raw.split_once(',') {
            Some((f, d)) => (f, d),
            None => (raw, "asc"),
        };
        Some(Sort {
            field: field.trim().to_string(),
            descending: dir.trim().eq_ignore_ascii_case("desc"),
        })
    }

    /// Slice one page out of the (already filtered and sorted) item list.
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, Meta) {
        let page = self.page.unwrap_or(0);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(size);

        // Saturate so an absurd `page` yields an empty last page instead
        // of wrapping.
        let page_items: Vec<T> = items
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect();

        let meta = Meta {
            page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            last: total_pages == 0 || page.saturating_add(1) >= total_pages,
        };
        (page_items, meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<usize>, size: Option<usize>, sort: Option<&str>) -> PageQuery {
        PageQuery {
            page,
            size,
            sort: sort.map(String::from),
        }
    }

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let (items, meta) = query(None, None, None).paginate((0..25).collect::<Vec<_>>());
        assert_eq!(items.len(), 20);
        assert_eq!(meta.page, 0);
        assert_eq!(meta.size, 20);
        assert_eq!(meta.total_elements, 25);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.first);
        assert!(!meta.last);
    }

    #[test]
    fn last_page_is_partial() {
        let (items, meta) = query(Some(2), Some(10), None).paginate((0..25).collect::<Vec<_>>());
        assert_eq!(items, vec![20, 21, 22, 23, 24]);
        assert!(!meta.first);
        assert!(meta.last);
    }

    #[test]
    fn page_past_the_end_is_empty_but_still_last() {
        let (items, meta) = query(Some(9), Some(10), None).paginate(vec![1, 2, 3]);
        assert!(items.is_empty());
        assert!(meta.last);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let (items, meta) = query(Some(usize::MAX), Some(20), None).paginate(vec![1, 2, 3]);
        assert!(items.is_empty());
        assert_eq!(meta.page, usize::MAX);
        assert!(!meta.first);
        assert!(meta.last);
    }

    #[test]
    fn empty_list_is_both_first_and_last() {
        let (items, meta) = query(None, None, None).paginate(Vec::<i32>::new());
        assert!(items.is_empty());
        assert_eq!(meta.total_pages, 0);
        assert!(meta.first);
        assert!(meta.last);
    }

    #[test]
    fn sort_parses_field_and_direction() {
        let sort = query(None, None, Some("name,desc")).sort().unwrap();
        assert_eq!(sort.field, "name");
        assert!(sort.descending);

        let sort = query(None, None, Some("sku")).sort().unwrap();
        assert_eq!(sort.field, "sku");
        assert!(!sort.descending);

        assert!(query(None, None, Some("")).sort().is_none());
    }

    #[test]
    fn zero_size_falls_back_to_one() {
        let (items, meta) = query(None, Some(0), None).paginate(vec![1, 2]);
        assert_eq!(items.len(), 1);
        assert_eq!(meta.size, 1);
    }
}
