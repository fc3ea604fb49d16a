//! Page state
//!
//! Every list page owns one [`PageState`]: search text, pagination, the open
//! modal and the selected row. Transitions are pure reducers so they can be
//! driven and tested without any rendering.
//!
//! # Architecture
//!
//! - [`table`]: search box, pagination and the page selector
//! - [`page`]: modal and selection on top of a table
//! - [`search`]: which columns of each record a search looks at

pub mod page;
pub mod search;
pub mod table;

pub use page::{ModalState, PageAction, PageState};
pub use search::{Searchable, filter};
pub use table::{Page, PageLink, TableAction, TableState, page_links, paginate, total_pages};

/// Filters `items` by the table's search text and cuts out the current page
pub fn visible<T: Searchable + Clone>(items: &[T], state: &TableState) -> Page<T> {
    let matching: Vec<T> = filter(items, &state.search).into_iter().cloned().collect();
    paginate(&matching, state)
}
