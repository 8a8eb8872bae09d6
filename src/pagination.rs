//! Client-side pagination over a filtered collection.
//!
//! The whole collection is fetched once and sliced locally; that ceiling
//! is accepted. Pages are 1-based and the current page is clamped so a
//! delete on the last page never leaves an empty view.

/// Current page and density for one list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: 10,
        }
    }
}

impl PageState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Number of pages needed for `total_items`; at least 1 so an empty
    /// collection still has a current page.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.items_per_page).max(1)
    }

    /// Jump to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: usize, total_items: usize) {
        self.current_page = n.clamp(1, self.total_pages(total_items));
    }

    /// Change density. Resets to page 1: the old offset is meaningless at
    /// the new size.
    pub fn set_page_size(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Pull the current page back into range after the collection shrank.
    pub fn clamp(&mut self, total_items: usize) {
        let total = self.total_pages(total_items);
        if self.current_page > total {
            self.current_page = total;
        }
    }

    /// The current page's window of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1) * self.items_per_page;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.items_per_page).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_windows() {
        let items: Vec<u32> = (0..12).collect();
        let mut pages = PageState::new(5);
        assert_eq!(pages.slice(&items), &[0, 1, 2, 3, 4]);

        pages.set_page(2, items.len());
        assert_eq!(pages.slice(&items), &[5, 6, 7, 8, 9]);

        pages.set_page(3, items.len());
        assert_eq!(pages.slice(&items), &[10, 11]);
    }

    #[test]
    fn test_total_pages() {
        let pages = PageState::new(5);
        assert_eq!(pages.total_pages(0), 1);
        assert_eq!(pages.total_pages(5), 1);
        assert_eq!(pages.total_pages(6), 2);
        assert_eq!(pages.total_pages(12), 3);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pages = PageState::new(5);
        pages.set_page(99, 12);
        assert_eq!(pages.current_page(), 3);
        pages.set_page(0, 12);
        assert_eq!(pages.current_page(), 1);
    }

    #[test]
    fn test_set_page_size_resets_to_first_page() {
        let mut pages = PageState::new(5);
        pages.set_page(3, 20);
        pages.set_page_size(10);
        assert_eq!(pages.current_page(), 1);
        assert_eq!(pages.items_per_page(), 10);
    }

    #[test]
    fn test_page_size_floor_is_one() {
        let pages = PageState::new(0);
        assert_eq!(pages.items_per_page(), 1);
        let mut pages = PageState::new(5);
        pages.set_page_size(0);
        assert_eq!(pages.items_per_page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        // 6 items at 5/page puts one item on page 2; deleting it must
        // clamp back to page 1, not render an empty page.
        let mut pages = PageState::new(5);
        pages.set_page(2, 6);
        assert_eq!(pages.current_page(), 2);

        pages.clamp(5);
        assert_eq!(pages.current_page(), 1);
    }

    #[test]
    fn test_clamp_on_empty_collection() {
        let mut pages = PageState::new(5);
        pages.set_page(2, 6);
        pages.clamp(0);
        assert_eq!(pages.current_page(), 1);
        let empty: [u32; 0] = [];
        assert_eq!(pages.slice(&empty), &[] as &[u32]);
    }

    #[test]
    fn test_slice_never_exceeds_page_size() {
        let items: Vec<u32> = (0..37).collect();
        let mut pages = PageState::new(7);
        for page in 1..=pages.total_pages(items.len()) {
            pages.set_page(page, items.len());
            assert!(pages.slice(&items).len() <= 7);
        }
    }
}
