use super::table::{self, TableAction, TableState};
use crate::model::DocumentKey;
use serde::{Deserialize, Serialize};

/// Which modal, if any, is open on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "camelCase")]
pub enum ModalState {
    #[default]
    Closed,
    Add,
    Edit(DocumentKey),
    View(DocumentKey),
    ConfirmDelete(DocumentKey),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    /// Record the open modal works on
    pub fn key(&self) -> Option<&DocumentKey> {
        match self {
            ModalState::Edit(key) | ModalState::View(key) | ModalState::ConfirmDelete(key) => {
                Some(key)
            }
            ModalState::Closed | ModalState::Add => None,
        }
    }
}

/// State of one list page: its table, its modal and the selected row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub table: TableState,
    pub modal: ModalState,
    pub selected: Option<DocumentKey>,
}

impl PageState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            table: TableState::new(rows_per_page),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PageAction {
    OpenAdd,
    OpenEdit(DocumentKey),
    OpenView(DocumentKey),
    ConfirmDelete(DocumentKey),
    Close,
    Table(TableAction),
}

/// Applies `action` to `state`. Opening a modal replaces whichever one was open.
pub fn reduce(state: &PageState, action: PageAction) -> PageState {
    let mut next = state.clone();
    match action {
        PageAction::OpenAdd => {
            next.modal = ModalState::Add;
            next.selected = None;
        }
        PageAction::OpenEdit(key) => {
            next.selected = Some(key.clone());
            next.modal = ModalState::Edit(key);
        }
        PageAction::OpenView(key) => {
            next.selected = Some(key.clone());
            next.modal = ModalState::View(key);
        }
        PageAction::ConfirmDelete(key) => {
            next.selected = Some(key.clone());
            next.modal = ModalState::ConfirmDelete(key);
        }
        PageAction::Close => {
            next.modal = ModalState::Closed;
            next.selected = None;
        }
        PageAction::Table(action) => {
            next.table = table::reduce(&state.table, action);
        }
    }
    next
}
