//! Driven port for the external identity service.
//!
//! The session store talks to the system of record for credentials and
//! sessions exclusively through [`IdentityService`], so tests can substitute
//! a double and the HTTP adapter stays swappable.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Credentials, Identity, Profile, Registration, UserId};

define_port_error! {
    /// Errors raised by identity service adapters.
    pub enum IdentityServiceError {
        /// The service refused the request (bad credentials, duplicate account).
        Rejected { message: String } => "identity service rejected the request: {message}",
        /// The request needs a session the service no longer recognises.
        Unauthenticated { message: String } => "identity service session invalid: {message}",
        /// The requested record does not exist.
        NotFound { message: String } => "identity record not found: {message}",
        /// The service did not answer in time.
        Timeout { message: String } => "identity service timed out: {message}",
        /// The service could not be reached or failed internally.
        Transport { message: String } => "identity service transport failed: {message}",
        /// The service answered with a payload that could not be decoded.
        Decode { message: String } => "identity service payload invalid: {message}",
    }
}

impl IdentityServiceError {
    /// Message reported by the service itself, without the category prefix.
    ///
    /// May be empty; callers showing it to users substitute a fallback.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message }
            | Self::Unauthenticated { message }
            | Self::NotFound { message }
            | Self::Timeout { message }
            | Self::Transport { message }
            | Self::Decode { message } => message.as_str(),
        }
    }
}

/// Port for authenticating, registering and resolving sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchange credentials for an authenticated identity and open a session.
    async fn authenticate(&self, credentials: &Credentials)
    -> Result<Identity, IdentityServiceError>;

    /// Create an account. The returned identity is not signed in.
    async fn create_account(
        &self,
        registration: &Registration,
    ) -> Result<Identity, IdentityServiceError>;

    /// End the current session.
    async fn terminate_session(&self) -> Result<(), IdentityServiceError>;

    /// Identity behind the session that is still valid, if any.
    async fn current_session(&self) -> Result<Option<Identity>, IdentityServiceError>;

    /// Profile row for `user_id`.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, IdentityServiceError>;
}

#[derive(Debug, Clone)]
struct FixtureAccount {
    id: UserId,
    name: String,
    email: String,
    password: String,
}

impl FixtureAccount {
    fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.email.as_str()).with_name(self.name.as_str())
    }
}

#[derive(Debug, Default)]
struct FixtureState {
    accounts: Vec<FixtureAccount>,
    signed_in: Option<UserId>,
}

/// In-memory identity service used when no remote endpoint is configured.
///
/// Accounts live for the lifetime of the value. One demo account is seeded:
/// `demo@granja.com` / `granja123`.
#[derive(Debug)]
pub struct FixtureIdentityService {
    state: Mutex<FixtureState>,
}

/// Email of the seeded fixture account.
pub const FIXTURE_EMAIL: &str = "demo@granja.com";
/// Password of the seeded fixture account.
pub const FIXTURE_PASSWORD: &str = "granja123";

impl Default for FixtureIdentityService {
    fn default() -> Self {
        Self::empty().with_account("Granja Demo", FIXTURE_EMAIL, FIXTURE_PASSWORD)
    }
}

impl FixtureIdentityService {
    /// Fixture with no accounts at all.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(FixtureState::default()),
        }
    }

    /// Seed an additional account.
    #[must_use]
    pub fn with_account(self, name: &str, email: &str, password: &str) -> Self {
        self.lock().accounts.push(FixtureAccount {
            id: UserId::random(),
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        });
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityService for FixtureIdentityService {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityServiceError> {
        let mut state = self.lock();
        let account = state
            .accounts
            .iter()
            .find(|account| {
                account.email.eq_ignore_ascii_case(credentials.email())
                    && account.password == credentials.password()
            })
            .cloned()
            .ok_or_else(|| IdentityServiceError::rejected("Invalid login credentials"))?;
        state.signed_in = Some(account.id.clone());
        Ok(account.identity())
    }

    async fn create_account(
        &self,
        registration: &Registration,
    ) -> Result<Identity, IdentityServiceError> {
        let mut state = self.lock();
        if state
            .accounts
            .iter()
            .any(|account| account.email.eq_ignore_ascii_case(registration.email()))
        {
            return Err(IdentityServiceError::rejected("User already registered"));
        }
        let account = FixtureAccount {
            id: UserId::random(),
            name: registration.name().to_owned(),
            email: registration.email().to_owned(),
            password: registration.password().to_owned(),
        };
        let identity = account.identity();
        state.accounts.push(account);
        Ok(identity)
    }

    async fn terminate_session(&self) -> Result<(), IdentityServiceError> {
        self.lock().signed_in = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Identity>, IdentityServiceError> {
        let state = self.lock();
        let Some(id) = state.signed_in.as_ref() else {
            return Ok(None);
        };
        Ok(state
            .accounts
            .iter()
            .find(|account| &account.id == id)
            .map(FixtureAccount::identity))
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, IdentityServiceError> {
        self.lock()
            .accounts
            .iter()
            .find(|account| &account.id == user_id)
            .map(|account| Profile::new(account.name.as_str(), account.email.as_str()))
            .ok_or_else(|| IdentityServiceError::not_found(format!("profile {user_id}")))
    }
}
