//! Identity provider
//!
//! Sign-in, sign-up, sign-out and password reset are delegated to an
//! external provider. The application only consumes its calls and the
//! current-user state used to gate routes.

mod memory;
pub mod routes;

pub use memory::{MemoryIdentityProvider, ResetRequest};
pub use routes::{Route, RouteDecision, gate};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email or Password is wrong!")]
    InvalidCredentials,

    #[error("Email '{0}' is already in use")]
    EmailInUse(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("No account for '{0}'")]
    UnknownEmail(String),

    #[error("Password reset link is invalid or has already been used")]
    InvalidResetToken,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    uid: String,
    email: String,
}

impl User {
    pub fn new(uid: String, email: String) -> Self {
        Self { uid, email }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Current-user state published by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not reported a session yet
    Loading,
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<User>;

    /// Creates an account. Does not change the current session.
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<User>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// Removes the account registered under `email`, ending its session if it is signed in
    async fn delete_account(&self, email: &str) -> AuthResult<()>;

    async fn send_password_reset(&self, email: &str) -> AuthResult<()>;

    /// Observable current-user state
    fn auth_state(&self) -> watch::Receiver<AuthState>;
}
