//! Sign-in form controller.

use tracing::debug;

use super::{FormPhase, SIGN_IN_FALLBACK, SubmitOutcome, top_level_message};
use crate::domain::ports::IdentityServiceError;
use crate::domain::{Credentials, FieldErrors, FormField, Identity, SessionStore, SignInInput};

/// State of the sign-in form.
#[derive(Debug, Default)]
pub struct SignInForm {
    input: SignInInput,
    field_errors: FieldErrors,
    error: Option<String>,
    phase: FormPhase,
}

impl SignInForm {
    /// Empty form in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field values.
    pub fn input(&self) -> &SignInInput {
        &self.input
    }

    /// Per-field validation errors from the last submit.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Top-level error from the last failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current phase.
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Caption of the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() { "Entrando..." } else { "Entrar" }
    }

    /// Replace the email and clear its field error.
    pub fn set_email(&mut self, value: impl Into<String>) {
        if self.accepts_edits() {
            self.input.email = value.into();
            self.field_errors.clear(FormField::Email);
        }
    }

    /// Replace the password and clear its field error.
    pub fn set_password(&mut self, value: impl Into<String>) {
        if self.accepts_edits() {
            self.input.password = value.into();
            self.field_errors.clear(FormField::Password);
        }
    }

    /// Validate and enter [`FormPhase::Submitting`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmitOutcome::Busy`] while a request is in flight and
    /// [`SubmitOutcome::Invalid`] when any field fails validation.
    pub fn begin_submit(&mut self) -> Result<Credentials, SubmitOutcome> {
        if self.phase != FormPhase::Idle {
            return Err(SubmitOutcome::Busy);
        }
        self.error = None;
        match Credentials::try_from_input(&self.input) {
            Ok(credentials) => {
                self.field_errors = FieldErrors::new();
                self.phase = FormPhase::Submitting;
                Ok(credentials)
            }
            Err(errors) => {
                debug!(%errors, "sign-in form rejected");
                self.field_errors = errors;
                Err(SubmitOutcome::Invalid)
            }
        }
    }

    /// Apply the store's answer and return to [`FormPhase::Idle`].
    ///
    /// Only a form in [`FormPhase::Submitting`] accepts an answer; otherwise
    /// the result is dropped and [`SubmitOutcome::Busy`] returned.
    pub fn complete_sign_in(
        &mut self,
        result: Result<Identity, IdentityServiceError>,
    ) -> SubmitOutcome {
        if self.phase != FormPhase::Submitting {
            return SubmitOutcome::Busy;
        }
        self.phase = FormPhase::Idle;
        match result {
            Ok(_) => SubmitOutcome::SignedIn,
            Err(error) => {
                self.error = Some(top_level_message(&error, SIGN_IN_FALLBACK));
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, call [`SessionStore::sign_in`] and apply the result.
    pub async fn submit(&mut self, store: &SessionStore) -> SubmitOutcome {
        let credentials = match self.begin_submit() {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        let result = store.sign_in(&credentials).await;
        self.complete_sign_in(result)
    }

    fn accepts_edits(&self) -> bool {
        self.phase == FormPhase::Idle
    }
}
