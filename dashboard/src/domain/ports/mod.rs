//! Ports separating the dashboard core from the identity backend.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_service;

#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::{
    FIXTURE_EMAIL, FIXTURE_PASSWORD, FixtureIdentityService, IdentityService,
    IdentityServiceError,
};
