//! Save, read and delete workflows
//!
//! [`Desk`] ties the document store, the identity provider and a clock
//! together. Every save follows the same shape: validate the form, resolve
//! the records it refers to, read the last business id, compute the next one
//! and write. The read and the write are two separate round trips; two desks
//! saving at once can pick the same id, in which case the store's unique
//! constraint rejects the second write and the user saves again.
//!
//! # Architecture
//!
//! - `customers`, `projects`, `agreements`, `tickets`: one workflow per record type
//! - [`SaveGuard`]: rejects a second submit while one is in flight

mod agreements;
mod customers;
mod guard;
mod projects;
mod tickets;

pub use agreements::{AgreementOptions, AgreementRow, CustomerOption};
pub use guard::{SaveGuard, SavePermit};

use crate::auth::{IdentityProvider, User};
use crate::config::DeskConfig;
use crate::core::{DeskError, Result};
use crate::lifecycle::{Clock, SystemClock};
use crate::model::{Customer, DocumentKey, MaintenanceAgreement, Project, Record, SupportTicket};
use crate::store::{DocumentStore, MemoryStore, records};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{error, info};

/// Back-office facade over a document store and an identity provider
pub struct Desk<S, I, C = SystemClock> {
    store: S,
    identity: I,
    clock: C,
    config: DeskConfig,
    guard: SaveGuard,
}

impl<S: DocumentStore, I: IdentityProvider, C: Clock> Desk<S, I, C> {
    pub fn new(store: S, identity: I, clock: C) -> Self {
        Self {
            store,
            identity,
            clock,
            config: DeskConfig::default(),
            guard: SaveGuard::new(),
        }
    }

    pub fn with_config(mut self, config: DeskConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// True while a save is awaiting the store
    pub fn is_saving(&self) -> bool {
        self.guard.is_busy()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        Ok(self.identity.sign_in(email, password).await?)
    }

    /// Ends the session. Failures are logged and otherwise ignored.
    pub async fn sign_out(&self) {
        if let Err(e) = self.identity.sign_out().await {
            error!(error = %e, "sign-out failed");
        }
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        Ok(self.identity.send_password_reset(email).await?)
    }

    /// Next business id of `R`, from the highest id currently stored
    pub async fn next_business_id<R: Record>(&self) -> Result<String> {
        let last = records::<R, _>(&self.store).last_business_id().await?;
        R::SEQUENCE.next(last.as_deref())
    }

    async fn delete_record<R: Record>(&self, key: &DocumentKey) -> Result<()> {
        records::<R, _>(&self.store).delete(key).await?;
        info!(collection = R::COLLECTION, %key, "record deleted");
        Ok(())
    }

    pub async fn delete_customer(&self, key: &DocumentKey) -> Result<()> {
        self.delete_record::<Customer>(key).await
    }

    pub async fn delete_project(&self, key: &DocumentKey) -> Result<()> {
        self.delete_record::<Project>(key).await
    }

    pub async fn delete_agreement(&self, key: &DocumentKey) -> Result<()> {
        self.delete_record::<MaintenanceAgreement>(key).await
    }

    pub async fn delete_ticket(&self, key: &DocumentKey) -> Result<()> {
        self.delete_record::<SupportTicket>(key).await
    }
}

fn not_found(what: &str, id: &str) -> DeskError {
    DeskError::NotFound(format!("{what} '{id}'"))
}

/// Empty store with a unique constraint on every business id field
pub fn desk_store() -> MemoryStore {
    MemoryStore::new()
        .with_unique(Customer::COLLECTION, Customer::ID_FIELD)
        .with_unique(Project::COLLECTION, Project::ID_FIELD)
        .with_unique(MaintenanceAgreement::COLLECTION, MaintenanceAgreement::ID_FIELD)
        .with_unique(SupportTicket::COLLECTION, SupportTicket::ID_FIELD)
}

/// [`desk_store`] loaded from the snapshot at `path` when it exists
pub async fn open_store(path: &Path) -> Result<MemoryStore> {
    Ok(desk_store().load_if_present(path).await?)
}
