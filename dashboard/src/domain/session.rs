//! Process-wide session state and the store that owns it.
//!
//! [`SessionStore`] is the only writer of [`SessionState`]. Readers hold a
//! [`SessionSubscription`] and react to change notifications instead of
//! polling. Every operation is a single attempt against the identity
//! service; failures are returned to the caller unchanged.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ports::{IdentityService, IdentityServiceError};
use super::user::ANONYMOUS_LABEL;
use super::{Credentials, Identity, Profile, Registration};

/// Authenticated identity plus the profile fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    identity: Identity,
    profile: Option<Profile>,
}

impl AuthenticatedSession {
    /// Pair an identity with its profile, when one could be loaded.
    pub fn new(identity: Identity, profile: Option<Profile>) -> Self {
        Self { identity, profile }
    }

    /// Signed-in identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Profile row, absent when the lookup failed.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Name to greet the user with: profile name, then account name, then
    /// the generic label.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(Profile::name)
            .or_else(|| self.identity.name())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(ANONYMOUS_LABEL)
    }

    /// Email to display: profile email, falling back to the account email.
    pub fn display_email(&self) -> &str {
        self.profile
            .as_ref()
            .map_or_else(|| self.identity.email(), Profile::email)
    }
}

/// Whether, and as whom, the user is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// The initial session lookup has not finished.
    #[default]
    Loading,
    /// No one is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated(AuthenticatedSession),
}

impl SessionState {
    /// True until the startup lookup resolves.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True when the user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The active session, if signed in.
    pub fn session(&self) -> Option<&AuthenticatedSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Loading | Self::Anonymous => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

/// Read-only handle that is notified whenever the session state changes.
#[derive(Debug, Clone)]
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// Snapshot of the current state, marking it as seen.
    pub fn current(&mut self) -> SessionState {
        self.receiver.borrow_and_update().clone()
    }

    /// True when a change arrived since the last [`Self::current`] call.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next change. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

/// Owner of the process-wide [`SessionState`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use dashboard::domain::SessionStore;
/// use dashboard::domain::ports::FixtureIdentityService;
///
/// let store = SessionStore::new(Arc::new(FixtureIdentityService::default()));
/// assert!(store.state().is_loading());
/// ```
pub struct SessionStore {
    identity: Arc<dyn IdentityService>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in the [`SessionState::Loading`] state.
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { identity, state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Register for change notifications.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.state.subscribe(),
        }
    }

    /// Resolve the startup `Loading` state from any session the identity
    /// service still recognises.
    ///
    /// A failing lookup resolves to [`SessionState::Anonymous`], as does a
    /// session the service rejects while its profile is loaded.
    pub async fn restore_session(&self) -> SessionState {
        let next = match self.identity.current_session().await {
            Ok(Some(identity)) => match self.load_session(identity).await {
                Ok(session) => SessionState::Authenticated(session),
                Err(error) => {
                    info!(%error, "remembered session expired");
                    SessionState::Anonymous
                }
            },
            Ok(None) => SessionState::Anonymous,
            Err(error) => {
                warn!(%error, "session lookup failed; continuing signed out");
                SessionState::Anonymous
            }
        };
        self.publish(next.clone());
        next
    }

    /// Authenticate and, on success, publish the authenticated session.
    ///
    /// # Errors
    ///
    /// Returns the identity service error. The state is left untouched,
    /// except that an authenticated session the service reports as
    /// unauthenticated is expired.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, IdentityServiceError> {
        let identity = self
            .identity
            .authenticate(credentials)
            .await
            .map_err(|error| self.expire_if_unauthenticated(error))?;
        let session = self
            .load_session(identity.clone())
            .await
            .map_err(|error| self.expire_if_unauthenticated(error))?;
        info!(user_id = %identity.id(), "signed in");
        self.publish(SessionState::Authenticated(session));
        Ok(identity)
    }

    /// Create an account. The new account is not signed in; callers send
    /// the user back to the sign-in view.
    ///
    /// # Errors
    ///
    /// Returns the identity service error; the state is left untouched.
    pub async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<Identity, IdentityServiceError> {
        let identity = self.identity.create_account(registration).await?;
        info!(user_id = %identity.id(), "account created");
        Ok(identity)
    }

    /// End the session. The local state becomes [`SessionState::Anonymous`]
    /// whether or not the identity service acknowledged the request.
    ///
    /// # Errors
    ///
    /// Returns the identity service error after the local state was cleared.
    pub async fn sign_out(&self) -> Result<(), IdentityServiceError> {
        let outcome = self.identity.terminate_session().await;
        self.publish(SessionState::Anonymous);
        info!("signed out");
        outcome
    }

    /// Ask the identity service whether the signed-in session still holds,
    /// expiring it when the service no longer recognises it.
    ///
    /// Does nothing unless the state is [`SessionState::Authenticated`].
    ///
    /// # Errors
    ///
    /// Returns lookup failures other than an invalid session; the state is
    /// left untouched for those.
    pub async fn revalidate_session(&self) -> Result<(), IdentityServiceError> {
        if !self.state.borrow().is_authenticated() {
            return Ok(());
        }
        match self.identity.current_session().await {
            Ok(Some(_)) => Ok(()),
            Ok(None) | Err(IdentityServiceError::Unauthenticated { .. }) => {
                self.expire_session();
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Drop a session the identity service no longer honours.
    pub fn expire_session(&self) {
        if self.state.borrow().is_authenticated() {
            info!("session expired");
            self.publish(SessionState::Anonymous);
        }
    }

    fn expire_if_unauthenticated(&self, error: IdentityServiceError) -> IdentityServiceError {
        if matches!(error, IdentityServiceError::Unauthenticated { .. }) {
            self.expire_session();
        }
        error
    }

    /// Pair `identity` with its profile. Only an invalid session fails;
    /// other lookup failures leave the profile empty.
    async fn load_session(
        &self,
        identity: Identity,
    ) -> Result<AuthenticatedSession, IdentityServiceError> {
        let profile = match self.identity.fetch_profile(identity.id()).await {
            Ok(profile) => Some(profile),
            Err(error @ IdentityServiceError::Unauthenticated { .. }) => return Err(error),
            Err(error) => {
                warn!(user_id = %identity.id(), %error, "profile lookup failed");
                None
            }
        };
        Ok(AuthenticatedSession::new(identity, profile))
    }

    fn publish(&self, next: SessionState) {
        debug!(state = next.label(), "session state changed");
        self.state.send_replace(next);
    }
}
