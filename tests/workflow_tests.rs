/// Back-office workflow tests
///
/// Customer -> project -> agreement -> ticket through the public API, on the
/// in-process store and identity provider.
/// Run with: cargo test --test workflow_tests

use async_trait::async_trait;
use chrono::NaiveDate;
use maintdesk::auth::{AuthState, Route, RouteDecision, gate};
use maintdesk::model::{CustomerType, IssueType};
use maintdesk::store::{Document, Query, StoreError, StoreResult, StoredDocument, records};
use maintdesk::validation::{AgreementForm, CustomerForm, ProjectForm, TicketForm};
use maintdesk::view::{self, PageAction, PageState, TableAction};
use maintdesk::{
    AgreementStatus, Customer, Desk, DeskError, DocumentKey, DocumentStore, ErrorKind,
    FixedClock, IdentityProvider, MemoryIdentityProvider, MemoryStore, Project, Record,
    desk_store, open_store,
};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_desk(today: NaiveDate) -> Desk<MemoryStore, MemoryIdentityProvider, FixedClock> {
    Desk::new(desk_store(), MemoryIdentityProvider::with_cost(4), FixedClock(today))
}

fn customer(username: &str, name: &str) -> CustomerForm {
    CustomerForm {
        username: username.into(),
        email: format!("{username}@example.com"),
        password: "password123".into(),
        customer_name: name.into(),
        customer_type: CustomerType::Individual,
        id_card: "1234567890123".into(),
        address: "1 Rama IV Rd".into(),
        contact_name: "Somchai".into(),
        mobile: "0891234567".into(),
        contact_email: "somchai@example.com".into(),
        ..CustomerForm::default()
    }
}

fn project(name: &str, customer_id: &str) -> ProjectForm {
    ProjectForm {
        project_name: name.into(),
        customer_id: customer_id.into(),
    }
}

fn agreement(customer_id: &str, project_id: &str, start: NaiveDate) -> AgreementForm {
    AgreementForm {
        customer_id: customer_id.into(),
        project_id: project_id.into(),
        start_date: Some(start),
    }
}

#[tokio::test]
async fn test_full_workflow() {
    let desk = new_desk(date(2024, 12, 15));

    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();
    desk.save_project(&project("ERP rollout", "CU000001"), None).await.unwrap();

    let ma = desk
        .save_agreement(&agreement("CU000001", "LS00001", date(2024, 1, 1)), None)
        .await
        .unwrap();
    assert_eq!(ma.record.ma_number, "MA00001");
    // 16 days left of the term
    assert_eq!(ma.record.status, AgreementStatus::Duration);

    let ticket = TicketForm {
        ma_number: "MA00001".into(),
        type_issue: Some(IssueType::PerformanceIssues),
        issue_description: "Month-end close is slow".into(),
    };
    let saved = desk.save_ticket(&ticket, None).await.unwrap();
    assert_eq!(saved.record.ticket_id, "ST000001");
    assert_eq!(saved.record.project_name, "ERP rollout");

    let rows = desk.list_agreements().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].lifecycle.remaining_label(), "16 DAYS");

    desk.delete_ticket(&saved.key).await.unwrap();
    assert!(desk.list_tickets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_continue_after_delete_of_older_records() {
    let desk = new_desk(date(2024, 1, 1));
    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();

    let first = desk.save_project(&project("A", "CU000001"), None).await.unwrap();
    desk.save_project(&project("B", "CU000001"), None).await.unwrap();
    desk.delete_project(&first.key).await.unwrap();

    let next = desk.save_project(&project("C", "CU000001"), None).await.unwrap();
    assert_eq!(next.record.project_id, "LS00003");
}

#[tokio::test]
async fn test_malformed_last_id_aborts_the_save() {
    let store = Arc::new(desk_store());
    let desk = Desk::new(
        Arc::clone(&store),
        MemoryIdentityProvider::with_cost(4),
        FixedClock(date(2024, 1, 1)),
    );
    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();

    let corrupt = Project {
        project_id: "LSxx".into(),
        project_name: "Imported".into(),
        customer_id: "CU000001".into(),
        customer_name: "Siam Widgets".into(),
    };
    records::<Project, _>(store.as_ref()).insert(&corrupt).await.unwrap();

    let err = desk.save_project(&project("New", "CU000001"), None).await.unwrap_err();
    assert!(matches!(err, DeskError::MalformedSequence { .. }));
    assert_eq!(err.kind(), ErrorKind::Sequence);
    assert_eq!(desk.list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_colliding_business_id_is_rejected_by_the_store() {
    let store = Arc::new(desk_store());
    let first = Project {
        project_id: "LS00001".into(),
        project_name: "One".into(),
        customer_id: "CU000001".into(),
        customer_name: "Siam Widgets".into(),
    };
    let second = Project {
        project_name: "Two".into(),
        ..first.clone()
    };

    let projects = records::<Project, _>(store.as_ref());
    projects.insert(&first).await.unwrap();
    let err = projects.insert(&second).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));

    let err = DeskError::from(err);
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn test_two_desks_share_one_store() {
    let store = Arc::new(desk_store());
    let today = FixedClock(date(2024, 1, 1));
    let a = Desk::new(Arc::clone(&store), MemoryIdentityProvider::with_cost(4), today);
    let b = Desk::new(Arc::clone(&store), MemoryIdentityProvider::with_cost(4), today);

    a.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();
    let saved = b.save_customer(&customer("thai", "Thai Parts"), None).await.unwrap();
    assert_eq!(saved.record.customer_id, "CU000002");
}

/// Store where another client's insert lands first: the next insert into
/// each armed collection is preceded by a copy of the same document.
struct RivalWriteStore {
    inner: MemoryStore,
    armed: Mutex<HashSet<String>>,
}

impl RivalWriteStore {
    fn new(collections: &[&str]) -> Self {
        Self {
            inner: desk_store(),
            armed: Mutex::new(collections.iter().map(|c| c.to_string()).collect()),
        }
    }
}

#[async_trait]
impl DocumentStore for RivalWriteStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentKey> {
        let rival = self.armed.lock().unwrap().remove(collection);
        if rival {
            self.inner.insert(collection, document.clone()).await?;
        }
        self.inner.insert(collection, document).await
    }

    async fn update(
        &self,
        collection: &str,
        key: &DocumentKey,
        document: Document,
    ) -> StoreResult<()> {
        self.inner.update(collection, key, document).await
    }

    async fn delete(&self, collection: &str, key: &DocumentKey) -> StoreResult<()> {
        self.inner.delete(collection, key).await
    }

    async fn get(&self, collection: &str, key: &DocumentKey) -> StoreResult<Option<Document>> {
        self.inner.get(collection, key).await
    }

    async fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        self.inner.query(collection, query).await
    }

    async fn find_by(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.inner.find_by(collection, field, value).await
    }
}

#[tokio::test]
async fn test_project_save_losing_the_id_race_is_rejected() {
    let desk = Desk::new(
        RivalWriteStore::new(&[Project::COLLECTION]),
        MemoryIdentityProvider::with_cost(4),
        FixedClock(date(2024, 1, 1)),
    );
    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();

    let err = desk.save_project(&project("ERP", "CU000001"), None).await.unwrap_err();
    assert!(matches!(err, DeskError::Store(StoreError::UniqueViolation { .. })));
    assert_eq!(err.kind(), ErrorKind::Remote);

    // only the other client's document is stored
    let projects = desk.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].record.project_id, "LS00001");

    // the next attempt moves past the taken id
    let next = desk.save_project(&project("CRM", "CU000001"), None).await.unwrap();
    assert_eq!(next.record.project_id, "LS00002");
}

#[tokio::test]
async fn test_customer_save_losing_the_id_race_removes_its_account() {
    let desk = Desk::new(
        RivalWriteStore::new(&[Customer::COLLECTION]),
        MemoryIdentityProvider::with_cost(4),
        FixedClock(date(2024, 1, 1)),
    );

    let err = desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(desk.list_customers().await.unwrap().len(), 1);
    assert_eq!(desk.identity().account_count().await, 0);

    let saved = desk.save_customer(&customer("thai", "Thai Parts"), None).await.unwrap();
    assert_eq!(saved.record.customer_id, "CU000002");
    assert_eq!(desk.identity().account_count().await, 1);
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desk.json");

    {
        let desk = new_desk(date(2024, 1, 1));
        desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();
        desk.save_project(&project("ERP", "CU000001"), None).await.unwrap();
        desk.store().save_snapshot(&path).await.unwrap();
    }

    let store = open_store(&path).await.unwrap();
    let desk = Desk::new(store, MemoryIdentityProvider::with_cost(4), FixedClock(date(2024, 1, 1)));
    assert_eq!(desk.list_customers().await.unwrap().len(), 1);

    let next = desk.save_project(&project("CRM", "CU000001"), None).await.unwrap();
    assert_eq!(next.record.project_id, "LS00002");
}

#[tokio::test]
async fn test_sign_in_gates_routes() {
    let desk = new_desk(date(2024, 1, 1));
    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();
    let state = desk.identity().auth_state();

    // creating the account does not sign anyone in
    assert_eq!(gate(Route::Customers, &state.borrow()), RouteDecision::Redirect(Route::Home));

    let err = desk.sign_in("siam@example.com", "nope-nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);

    desk.sign_in("siam@example.com", "password123").await.unwrap();
    assert_eq!(gate(Route::Customers, &state.borrow()), RouteDecision::Render);
    assert_eq!(
        gate(Route::SignIn, &state.borrow()),
        RouteDecision::Redirect(Route::Dashboard)
    );

    desk.sign_out().await;
    assert_eq!(*state.borrow(), AuthState::SignedOut);
}

#[tokio::test]
async fn test_list_page_after_delete() {
    let desk = new_desk(date(2024, 1, 1));
    desk.save_customer(&customer("siam", "Siam Widgets"), None).await.unwrap();
    for i in 1..=11 {
        desk.save_project(&project(&format!("Project {i}"), "CU000001"), None)
            .await
            .unwrap();
    }

    let items = desk.list_projects().await.unwrap();
    let mut page = view::page::reduce(
        &PageState::new(10),
        PageAction::Table(TableAction::GoTo { page: 2, total_items: items.len() }),
    );
    let shown = view::visible(&items, &page.table);
    assert_eq!(shown.items.len(), 1);

    let last = shown.items[0].key.clone();
    page = view::page::reduce(&page, PageAction::ConfirmDelete(last.clone()));
    desk.delete_project(&last).await.unwrap();

    let items = desk.list_projects().await.unwrap();
    page = view::page::reduce(&page, PageAction::Close);
    page = view::page::reduce(
        &page,
        PageAction::Table(TableAction::ItemRemoved { remaining: items.len() }),
    );
    assert_eq!(page.table.current_page, 1);
    assert_eq!(view::visible(&items, &page.table).items.len(), 10);
}

#[test]
fn test_password_reset_outside_a_runtime() {
    let idp = MemoryIdentityProvider::with_cost(4);
    tokio_test::block_on(async {
        idp.sign_up("siam@example.com", "password123").await.unwrap();
        idp.send_password_reset("siam@example.com").await.unwrap();
    });

    let requests = tokio_test::block_on(idp.reset_requests());
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].email, "siam@example.com");
}
