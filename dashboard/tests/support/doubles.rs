//! Recording identity service double for behaviour suites.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashboard::domain::ports::{IdentityService, IdentityServiceError};
use dashboard::domain::{Credentials, Identity, Profile, Registration, UserId};

/// Calls observed by [`RecordingIdentityService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IdentityCall {
    Authenticate { email: String },
    CreateAccount { name: String, email: String },
    TerminateSession,
    CurrentSession,
    FetchProfile { user_id: String },
}

#[derive(Debug, Clone)]
struct Responses {
    authenticate: Result<Identity, IdentityServiceError>,
    create_account: Result<Identity, IdentityServiceError>,
    terminate_session: Result<(), IdentityServiceError>,
    current_session: Result<Option<Identity>, IdentityServiceError>,
    fetch_profile: Result<Profile, IdentityServiceError>,
}

#[derive(Clone)]
pub(crate) struct RecordingIdentityService {
    calls: Arc<Mutex<Vec<IdentityCall>>>,
    responses: Arc<Mutex<Responses>>,
}

impl RecordingIdentityService {
    /// Service that knows `identity`, answers every call successfully and
    /// reports no existing session.
    pub(crate) fn new(identity: Identity, profile: Profile) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(Responses {
                authenticate: Ok(identity.clone()),
                create_account: Ok(identity),
                terminate_session: Ok(()),
                current_session: Ok(None),
                fetch_profile: Ok(profile),
            })),
        }
    }

    pub(crate) fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().expect("identity calls lock").clone()
    }

    pub(crate) fn count(&self, predicate: impl Fn(&IdentityCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub(crate) fn set_authenticate(&self, response: Result<Identity, IdentityServiceError>) {
        self.responses.lock().expect("identity responses lock").authenticate = response;
    }

    pub(crate) fn set_terminate_session(&self, response: Result<(), IdentityServiceError>) {
        self.responses
            .lock()
            .expect("identity responses lock")
            .terminate_session = response;
    }

    pub(crate) fn set_current_session(
        &self,
        response: Result<Option<Identity>, IdentityServiceError>,
    ) {
        self.responses
            .lock()
            .expect("identity responses lock")
            .current_session = response;
    }

    fn record(&self, call: IdentityCall) -> Responses {
        self.calls.lock().expect("identity calls lock").push(call);
        self.responses
            .lock()
            .expect("identity responses lock")
            .clone()
    }
}

#[async_trait]
impl IdentityService for RecordingIdentityService {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityServiceError> {
        self.record(IdentityCall::Authenticate {
            email: credentials.email().to_owned(),
        })
        .authenticate
    }

    async fn create_account(
        &self,
        registration: &Registration,
    ) -> Result<Identity, IdentityServiceError> {
        self.record(IdentityCall::CreateAccount {
            name: registration.name().to_owned(),
            email: registration.email().to_owned(),
        })
        .create_account
    }

    async fn terminate_session(&self) -> Result<(), IdentityServiceError> {
        self.record(IdentityCall::TerminateSession).terminate_session
    }

    async fn current_session(&self) -> Result<Option<Identity>, IdentityServiceError> {
        self.record(IdentityCall::CurrentSession).current_session
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, IdentityServiceError> {
        self.record(IdentityCall::FetchProfile {
            user_id: user_id.to_string(),
        })
        .fetch_profile
    }
}
