use serde::{Serialize, Serializer};

const MAX_PLAIN_PAGES: usize = 7;
const WINDOW: usize = 2;

/// Entry in a pager: a page number or an ellipsis gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageItem::Page(n) => serializer.serialize_u64(*n as u64),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Client side pagination over an in-memory list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator {
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_items: usize,
}

impl Paginator {
    pub fn new(total_items: usize, items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page)
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Items of the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page.saturating_sub(1) * self.items_per_page).min(items.len());
        let end = (start + self.items_per_page).min(items.len());
        &items[start..end]
    }

    /// Pager entries: every page when there are few, otherwise the first,
    /// a window around the current page and the last, with gaps between.
    pub fn display_pages(&self) -> Vec<PageItem> {
        let total = self.total_pages();
        let current = self.current_page;

        if total <= MAX_PLAIN_PAGES {
            return (1..=total).map(PageItem::Page).collect();
        }

        let mut start = current.saturating_sub(WINDOW).max(2);
        let mut end = (current + WINDOW).min(total - 1);

        if current <= 3 {
            end = 5.min(total - 1);
        } else if current >= total - 2 {
            start = (total - 4).max(2);
        }

        let mut pages = vec![PageItem::Page(1)];
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
        pages.extend((start..=end).map(PageItem::Page));
        if end < total - 1 {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(total));
        pages
    }
}

/// Incremental "load more" list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMore {
    pub step: usize,
    pub displayed: usize,
}

impl LoadMore {
    pub const HISTORY_STEP: usize = 12;

    pub fn new(step: usize) -> Self {
        Self {
            step: step.max(1),
            displayed: step.max(1),
        }
    }

    /// Shows `rounds` steps worth of items
    pub fn rounds(step: usize, rounds: usize) -> Self {
        let step = step.max(1);
        Self {
            step,
            displayed: step.saturating_mul(rounds.max(1)),
        }
    }

    pub fn load_more(&mut self) {
        self.displayed = self.displayed.saturating_add(self.step);
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.displayed.min(items.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.displayed < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    fn pager(total_pages: usize, current: usize) -> Paginator {
        let mut p = Paginator::new(total_pages * 10, 10);
        p.go_to(current);
        p
    }

    #[test]
    fn test_few_pages() {
        assert_eq!(
            pager(3, 2).display_pages(),
            vec![Page(1), Page(2), Page(3)]
        );
        assert!(Paginator::new(0, 10).display_pages().is_empty());
    }

    #[test]
    fn test_start_window() {
        assert_eq!(
            pager(10, 1).display_pages(),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_middle_window() {
        assert_eq!(
            pager(10, 5).display_pages(),
            vec![
                Page(1),
                Ellipsis,
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(10)
            ]
        );
    }

    #[test]
    fn test_end_window() {
        assert_eq!(
            pager(10, 10).display_pages(),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut p = Paginator::new(25, 10);
        p.previous();
        assert_eq!(p.current_page, 1);
        p.next();
        p.next();
        p.next();
        assert_eq!(p.current_page, 3);
        p.go_to(99);
        assert_eq!(p.current_page, 3);
        p.go_to(0);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn test_slice() {
        let items: Vec<i32> = (1..=25).collect();
        let mut p = Paginator::new(items.len(), 10);
        p.go_to(3);
        assert_eq!(p.slice(&items), &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_serialize_items() {
        let json = serde_json::to_string(&pager(10, 5).display_pages()).unwrap();
        assert_eq!(json, r#"[1,"...",3,4,5,6,7,"...",10]"#);
    }

    #[test]
    fn test_load_more() {
        let items: Vec<i32> = (1..=30).collect();
        let mut more = LoadMore::new(LoadMore::HISTORY_STEP);
        assert_eq!(more.visible(&items).len(), 12);
        assert!(more.has_more(items.len()));
        more.load_more();
        more.load_more();
        assert_eq!(more.visible(&items).len(), 30);
        assert!(!more.has_more(items.len()));
        assert_eq!(LoadMore::rounds(12, 2).displayed, 24);
    }

    #[test]
    fn test_load_more_saturates() {
        let items: Vec<i32> = (1..=5).collect();
        let mut more = LoadMore::rounds(LoadMore::HISTORY_STEP, usize::MAX);
        assert_eq!(more.displayed, usize::MAX);
        more.load_more();
        assert_eq!(more.displayed, usize::MAX);
        assert_eq!(more.visible(&items).len(), 5);
        assert!(!more.has_more(items.len()));
    }
}
