// ============================================================================
// maintdesk Library
// ============================================================================

//! Back office for customers, projects, maintenance agreements and support
//! tickets.
//!
//! Records live in an external document store and sign-in is delegated to an
//! external identity provider; both sit behind traits ([`DocumentStore`],
//! [`IdentityProvider`]) with in-process implementations for tests and the
//! command line tool.
//!
//! # Examples
//!
//! ```
//! use maintdesk::sequence::next_id;
//!
//! assert_eq!(next_id("CU", 6, Some("CU000042")).unwrap(), "CU000043");
//! assert_eq!(next_id("MA", 5, None).unwrap(), "MA00001");
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod lifecycle;
pub mod model;
pub mod sequence;
pub mod service;
pub mod store;
pub mod validation;
pub mod view;

// Re-export main types for convenience
pub use auth::{AuthState, IdentityProvider, MemoryIdentityProvider, User};
pub use config::DeskConfig;
pub use core::{DeskError, ErrorKind, Result};
pub use lifecycle::{AgreementStatus, Clock, FixedClock, Lifecycle, SystemClock, classify};
pub use model::{
    Customer, DocumentKey, MaintenanceAgreement, Project, Record, Stored, SupportTicket,
};
pub use sequence::{SequenceSpec, next_id};
pub use service::{Desk, desk_store, open_store};
pub use store::{DocumentStore, MemoryStore};
