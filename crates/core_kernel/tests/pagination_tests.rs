//! Tests for page requests and paged result sets

use core_kernel::{CoreError, Page, PageRequest, MAX_PAGE_SIZE};
use proptest::prelude::*;

mod page_request {
    use super::*;

    #[test]
    fn test_rejects_page_zero() {
        assert!(matches!(PageRequest::new(0, 10), Err(CoreError::InvalidPage(_))));
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(matches!(PageRequest::new(1, 0), Err(CoreError::InvalidPage(_))));
    }

    #[test]
    fn test_rejects_oversized_page() {
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_offset_of_third_page() {
        let request = PageRequest::new(3, 20).unwrap();

        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);
    }
}

mod page {
    use super::*;

    #[test]
    fn test_from_all_slices_window() {
        let all: Vec<u32> = (1..=7).collect();
        let page = Page::from_all(all, PageRequest::new(2, 3).unwrap());

        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_last_partial_page() {
        let all: Vec<u32> = (1..=7).collect();
        let page = Page::from_all(all, PageRequest::new(3, 3).unwrap());

        assert_eq!(page.items, vec![7]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page: Page<u32> = Page::from_all(Vec::new(), PageRequest::default());

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::from_all(vec![1, 2, 3], PageRequest::new(1, 2).unwrap());
        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.total, 3);
        assert_eq!(mapped.pages, 2);
    }

    #[test]
    fn test_serializes_continuation_metadata() {
        let page = Page::from_all(vec!["a", "b"], PageRequest::new(1, 1).unwrap());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["items"], serde_json::json!(["a"]));
        assert_eq!(json["total"], 2);
        assert_eq!(json["page"], 1);
        assert_eq!(json["size"], 1);
        assert_eq!(json["pages"], 2);
    }
}

proptest! {
    #[test]
    fn prop_pages_partition_the_result_set(len in 0usize..250, size in 1u32..=MAX_PAGE_SIZE) {
        let all: Vec<usize> = (0..len).collect();
        let first = Page::from_all(all.clone(), PageRequest::new(1, size).unwrap());

        let mut collected = Vec::new();
        for page_no in 1..=first.pages.max(1) {
            let page = Page::from_all(all.clone(), PageRequest::new(page_no as u32, size).unwrap());
            prop_assert!(page.items.len() <= size as usize);
            collected.extend(page.items);
        }

        prop_assert_eq!(collected, all);
    }
}
