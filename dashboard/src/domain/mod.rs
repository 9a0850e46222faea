//! Domain primitives, validation and the session store.
//!
//! Purpose: keep the authentication contract independent of rendering and of
//! the identity backend's transport. Inbound view code drives these types;
//! outbound adapters implement [`ports::IdentityService`].
//!
//! Public surface:
//! - `validate_*` functions, `FieldErrors`: field-level form validation.
//! - `Credentials`, `Registration`: payloads that passed validation.
//! - `Identity`, `Profile`, `UserId`: records owned by the identity service.
//! - `SessionStore`, `SessionState`: the observable session.

pub mod auth;
pub mod ports;
pub mod session;
pub mod user;
pub mod validation;

pub use self::auth::{Credentials, Registration, RegistrationInput, SignInInput};
pub use self::session::{AuthenticatedSession, SessionState, SessionStore, SessionSubscription};
pub use self::user::{ANONYMOUS_LABEL, Identity, Profile, UserId, UserIdValidationError};
pub use self::validation::{
    FieldError, FieldErrors, FormField, NAME_MIN, PASSWORD_MIN, validate_confirmation,
    validate_email, validate_name, validate_password,
};
