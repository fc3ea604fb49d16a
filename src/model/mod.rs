//! Back-office records
//!
//! Each record type maps to one document collection and owns one id
//! sequence. Field names are camelCase on the wire so documents written by
//! other clients of the same collections deserialize unchanged.

mod agreement;
mod customer;
mod project;
mod ticket;

pub use agreement::MaintenanceAgreement;
pub use customer::{BranchType, Customer, CustomerType};
pub use project::Project;
pub use ticket::{IssueType, SupportTicket};

use crate::sequence::SequenceSpec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection names in the document store
pub mod collections {
    pub const CUSTOMERS: &str = "customers";
    pub const PROJECTS: &str = "projects";
    pub const MAINTENANCE_AGREEMENTS: &str = "maintenanceAgreements";
    pub const SUPPORT_TICKETS: &str = "supportTickets";
}

/// Opaque storage key assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record type stored in its own collection with its own business id sequence
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const SEQUENCE: SequenceSpec;
    /// Document field holding the business id
    const ID_FIELD: &'static str;

    fn business_id(&self) -> &str;
}

/// A record together with the key it is stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub key: DocumentKey,
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(key: DocumentKey, record: T) -> Self {
        Self { key, record }
    }
}
