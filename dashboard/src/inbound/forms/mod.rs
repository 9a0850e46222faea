//! Form controllers for the sign-in and registration screens.
//!
//! Each controller owns its field values, field errors, a single top-level
//! error and a phase:
//!
//! ```text
//! Idle --submit(valid)--> Submitting --error--> Idle
//!                                    \--ok (sign-up)--> Success
//! ```
//!
//! Submission is split into `begin_submit` and `complete_*` so a renderer can
//! observe the `Submitting` phase while the store call is in flight; `submit`
//! runs both around the store call.

mod sign_in;
mod sign_up;

use std::time::Duration;

use crate::domain::ports::IdentityServiceError;

pub use sign_in::SignInForm;
pub use sign_up::SignUpForm;

/// Delay between a successful registration and the switch to sign-in.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Top-level error shown when a failed sign-in carries no message.
pub const SIGN_IN_FALLBACK: &str = "Erro ao fazer login";
/// Top-level error shown when a failed registration carries no message.
pub const SIGN_UP_FALLBACK: &str = "Erro ao criar conta";

/// Lifecycle of one form instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// Accepting edits and submissions.
    #[default]
    Idle,
    /// A request is in flight; inputs and submit are disabled.
    Submitting,
    /// Registration succeeded; the form is frozen until the redirect.
    Success,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field validation failed; nothing was sent.
    Invalid,
    /// The form is not accepting submissions in its current phase.
    Busy,
    /// The identity service refused or failed; see the top-level error.
    Failed,
    /// Sign-in succeeded; the session store now holds the session.
    SignedIn,
    /// Registration succeeded; the redirect to sign-in is scheduled.
    AccountCreated,
}

fn top_level_message(error: &IdentityServiceError, fallback: &str) -> String {
    let message = error.message();
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message.to_owned()
    }
}

#[cfg(test)]
mod tests;
