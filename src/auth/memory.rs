use super::{AuthError, AuthResult, AuthState, IdentityProvider, User};
use crate::config::DeskConfig;
use crate::validation::{MIN_PASSWORD_LENGTH, is_valid_email, is_valid_password};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{RwLock, watch};
use tracing::{info, warn};
use uuid::Uuid;

/// Account record
#[derive(Debug, Clone)]
struct Account {
    user: User,
    password_hash: String,
}

/// A password reset that would have been mailed to `email`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    pub email: String,
    pub token: String,
}

/// In-process identity provider
///
/// Accounts are keyed by lower-cased email and passwords are stored as
/// bcrypt hashes. Reset mails are not sent; the requests are kept so a
/// caller can deliver them or confirm them directly.
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    resets: RwLock<Vec<ResetRequest>>,
    state: watch::Sender<AuthState>,
    bcrypt_cost: u32,
    min_password_length: usize,
}

impl MemoryIdentityProvider {
    /// Creates a provider with no accounts and no session
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Creates a provider hashing with the given bcrypt cost
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self {
            accounts: RwLock::new(HashMap::new()),
            resets: RwLock::new(Vec::new()),
            state,
            bcrypt_cost,
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }

    /// Creates a provider using the hashing cost and password rule of `config`
    pub fn from_config(config: &DeskConfig) -> Self {
        Self::with_cost(config.bcrypt_cost).min_password_length(config.min_password_length)
    }

    pub fn min_password_length(mut self, min: usize) -> Self {
        self.min_password_length = min;
        self
    }

    fn hash_password(&self, password: &str) -> AuthResult<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(|e| AuthError::Hash(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if !is_valid_password(password, self.min_password_length) {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters long",
                self.min_password_length
            )));
        }
        Ok(())
    }

    /// Reset requests issued so far, oldest first
    pub async fn reset_requests(&self) -> Vec<ResetRequest> {
        self.resets.read().await.clone()
    }

    /// Sets a new password using a token from [`ResetRequest`]. Tokens are single use.
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AuthResult<()> {
        self.validate_password(new_password)?;

        let request = {
            let mut resets = self.resets.write().await;
            let pos = resets
                .iter()
                .position(|r| r.token == token)
                .ok_or(AuthError::InvalidResetToken)?;
            resets.remove(pos)
        };

        let hash = self.hash_password(new_password)?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&request.email)
            .ok_or(AuthError::InvalidResetToken)?;
        account.password_hash = hash;

        info!(email = %request.email, "password reset confirmed");
        Ok(())
    }

    /// Number of accounts
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<User> {
        let accounts = self.accounts.read().await;

        let account = accounts
            .get(&Self::normalize(email))
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(password, &account.password_hash) {
            warn!(email, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = account.user.clone();
        self.state.send_replace(AuthState::SignedIn(user.clone()));
        info!(uid = user.uid(), "signed in");
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<User> {
        let email = Self::normalize(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail(email));
        }
        self.validate_password(password)?; // before hashing

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailInUse(email));
        }

        let user = User::new(Uuid::new_v4().simple().to_string(), email.clone());
        let account = Account {
            user: user.clone(),
            password_hash: self.hash_password(password)?,
        };
        accounts.insert(email, account);

        info!(uid = user.uid(), "account created");
        Ok(user)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.state.send_replace(AuthState::SignedOut);
        Ok(())
    }

    async fn delete_account(&self, email: &str) -> AuthResult<()> {
        let email = Self::normalize(email);
        let account = self
            .accounts
            .write()
            .await
            .remove(&email)
            .ok_or_else(|| AuthError::UnknownEmail(email.clone()))?;

        self.resets.write().await.retain(|r| r.email != email);
        self.state.send_if_modified(|state| match state.user() {
            Some(user) if user.uid() == account.user.uid() => {
                *state = AuthState::SignedOut;
                true
            }
            _ => false,
        });

        info!(uid = account.user.uid(), "account deleted");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> AuthResult<()> {
        let email = Self::normalize(email);
        if !self.accounts.read().await.contains_key(&email) {
            return Err(AuthError::UnknownEmail(email));
        }

        let request = ResetRequest {
            email,
            token: Uuid::new_v4().simple().to_string(),
        };
        info!(email = %request.email, "password reset requested");
        self.resets.write().await.push(request);
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
