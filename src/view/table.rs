use serde::{Deserialize, Serialize};

/// Default number of rows on one page
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Search box and pagination of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub search: String,
    /// 1-based
    pub current_page: usize,
    pub rows_per_page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl TableState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            search: String::new(),
            current_page: 1,
            rows_per_page: rows_per_page.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TableAction {
    /// New search text; goes back to the first page
    Search(String),
    /// New page size; goes back to the first page
    SetRowsPerPage(usize),
    /// Jump to a page, clamped to the pages that exist
    GoTo { page: usize, total_items: usize },
    Next { total_items: usize },
    Previous,
    /// A row was deleted; `remaining` rows are left in the filtered list
    ItemRemoved { remaining: usize },
}

/// Applies `action` to `state`
pub fn reduce(state: &TableState, action: TableAction) -> TableState {
    let mut next = state.clone();
    match action {
        TableAction::Search(search) => {
            next.search = search;
            next.current_page = 1;
        }
        TableAction::SetRowsPerPage(rows) => {
            next.rows_per_page = rows.max(1);
            next.current_page = 1;
        }
        TableAction::GoTo { page, total_items } => {
            let last = total_pages(total_items, next.rows_per_page).max(1);
            next.current_page = page.clamp(1, last);
        }
        TableAction::Next { total_items } => {
            let last = total_pages(total_items, next.rows_per_page).max(1);
            next.current_page = (next.current_page + 1).min(last);
        }
        TableAction::Previous => {
            next.current_page = next.current_page.saturating_sub(1).max(1);
        }
        TableAction::ItemRemoved { remaining } => {
            let pages = total_pages(remaining, next.rows_per_page);
            if next.current_page > pages && next.current_page > 1 {
                next.current_page -= 1;
            }
        }
    }
    next
}

/// Number of pages needed for `total_items`; zero for an empty list
pub fn total_pages(total_items: usize, rows_per_page: usize) -> usize {
    total_items.div_ceil(rows_per_page.max(1))
}

/// One page of a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Cuts the current page out of `items`
pub fn paginate<T: Clone>(items: &[T], state: &TableState) -> Page<T> {
    let rows = state.rows_per_page.max(1);
    let start = (state.current_page.max(1) - 1) * rows;

    Page {
        items: items.iter().skip(start).take(rows).cloned().collect(),
        current_page: state.current_page.max(1),
        total_pages: total_pages(items.len(), rows),
        total_items: items.len(),
    }
}

/// Entry of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Page selector: first, last and the pages next to the current one are
/// shown; the pages two away from the current one collapse into an ellipsis.
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    for i in 1..=total {
        if i == 1 || i == total || (i + 1 >= current && i <= current + 1) {
            links.push(PageLink::Page(i));
        } else if i + 2 == current || i == current + 2 {
            links.push(PageLink::Ellipsis);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Ellipsis, Page as P};

    #[test]
    fn test_search_resets_page() {
        let state = TableState { current_page: 3, ..TableState::default() };
        let next = reduce(&state, TableAction::Search("acme".into()));
        assert_eq!(next.search, "acme");
        assert_eq!(next.current_page, 1);
    }

    #[test]
    fn test_rows_per_page_resets_page() {
        let state = TableState { current_page: 3, ..TableState::default() };
        let next = reduce(&state, TableAction::SetRowsPerPage(25));
        assert_eq!(next.rows_per_page, 25);
        assert_eq!(next.current_page, 1);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let state = TableState::default();
        let state = reduce(&state, TableAction::Previous);
        assert_eq!(state.current_page, 1);

        let state = reduce(&state, TableAction::GoTo { page: 9, total_items: 25 });
        assert_eq!(state.current_page, 3);

        let state = reduce(&state, TableAction::Next { total_items: 25 });
        assert_eq!(state.current_page, 3);

        let state = reduce(&state, TableAction::GoTo { page: 0, total_items: 25 });
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_removing_last_row_of_page_steps_back() {
        let state = TableState { current_page: 3, ..TableState::default() };
        assert_eq!(reduce(&state, TableAction::ItemRemoved { remaining: 20 }).current_page, 2);
        assert_eq!(reduce(&state, TableAction::ItemRemoved { remaining: 21 }).current_page, 3);

        let first = TableState::default();
        assert_eq!(reduce(&first, TableAction::ItemRemoved { remaining: 0 }).current_page, 1);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();
        let state = TableState { current_page: 3, ..TableState::default() };

        let page = paginate(&items, &state);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let empty = paginate::<u32>(&[], &TableState::default());
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_page_links() {
        assert_eq!(page_links(1, 1), vec![P(1)]);
        assert_eq!(page_links(1, 3), vec![P(1), P(2), P(3)]);
        assert_eq!(
            page_links(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
        assert_eq!(page_links(1, 10), vec![P(1), P(2), Ellipsis, P(10)]);
        assert_eq!(page_links(10, 10), vec![P(1), Ellipsis, P(9), P(10)]);
        assert!(page_links(1, 0).is_empty());
    }
}
