//! Slicing of the ranked title series for display.

use watchlog_core::models::TitlePoint;

/// Default number of titles shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// One page of the ranked title list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePage<'a> {
    /// Zero-based page index after clamping.
    pub index: usize,
    /// Total number of pages (at least 1).
    pub count: usize,
    /// Rank of the first item on this page, zero-based.
    pub offset: usize,
    pub items: &'a [TitlePoint],
}

/// The `n` highest-ranked titles.
pub fn top_titles(points: &[TitlePoint], n: usize) -> &[TitlePoint] {
    &points[..n.min(points.len())]
}

/// Number of pages needed for `len` items; an empty list still has one page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Slice out page `index`, clamped to the last page.
pub fn title_page(points: &[TitlePoint], page_size: usize, index: usize) -> TitlePage<'_> {
    let size = page_size.max(1);
    let count = page_count(points.len(), size);
    let index = index.min(count - 1);
    let offset = (index * size).min(points.len());
    let end = (offset + size).min(points.len());

    TitlePage {
        index,
        count,
        offset,
        items: &points[offset..end],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<TitlePoint> {
        (0..n)
            .map(|i| TitlePoint {
                title: format!("Title {i}"),
                metric: (n - i) as u64,
            })
            .collect()
    }

    #[test]
    fn test_top_titles_truncates() {
        let p = points(15);
        let top = top_titles(&p, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].title, "Title 0");
    }

    #[test]
    fn test_top_titles_shorter_list() {
        let p = points(3);
        assert_eq!(top_titles(&p, 10).len(), 3);
        assert!(top_titles(&[], 10).is_empty());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 8), 1);
        assert_eq!(page_count(8, 8), 1);
        assert_eq!(page_count(9, 8), 2);
        assert_eq!(page_count(17, 8), 3);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_title_page_slices() {
        let p = points(20);
        let page = title_page(&p, DEFAULT_PAGE_SIZE, 1);
        assert_eq!(page.index, 1);
        assert_eq!(page.count, 3);
        assert_eq!(page.offset, 8);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.items[0].title, "Title 8");

        let last = title_page(&p, DEFAULT_PAGE_SIZE, 2);
        assert_eq!(last.items.len(), 4);
    }

    #[test]
    fn test_title_page_clamps_index() {
        let p = points(10);
        let page = title_page(&p, 8, 99);
        assert_eq!(page.index, 1);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_title_page_empty() {
        let page = title_page(&[], 8, 0);
        assert_eq!(page.index, 0);
        assert_eq!(page.count, 1);
        assert!(page.items.is_empty());
    }
}
