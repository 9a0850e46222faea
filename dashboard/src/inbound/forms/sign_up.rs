//! Registration form controller.

use tokio::time::sleep;
use tracing::debug;

use super::{FormPhase, REDIRECT_DELAY, SIGN_UP_FALLBACK, SubmitOutcome, top_level_message};
use crate::domain::ports::IdentityServiceError;
use crate::domain::{FieldErrors, FormField, Identity, Registration, RegistrationInput, SessionStore};

/// State of the registration form.
#[derive(Debug, Default)]
pub struct SignUpForm {
    input: RegistrationInput,
    field_errors: FieldErrors,
    error: Option<String>,
    phase: FormPhase,
}

impl SignUpForm {
    /// Empty form in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field values.
    pub fn input(&self) -> &RegistrationInput {
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

    /// True once the account exists and the redirect is pending.
    pub fn is_success(&self) -> bool {
        self.phase == FormPhase::Success
    }

    /// Caption of the submit control.
    pub fn submit_label(&self) -> &'static str {
        match self.phase {
            FormPhase::Idle => "Cadastrar",
            FormPhase::Submitting => "Cadastrando...",
            FormPhase::Success => "Cadastrado!",
        }
    }

    /// Return to an empty idle form, as when the registration view is shown
    /// afresh after a redirect.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace `field` and clear its field error.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        if self.phase != FormPhase::Idle {
            return;
        }
        let value = value.into();
        match field {
            FormField::Name => self.input.name = value,
            FormField::Email => self.input.email = value,
            FormField::Password => self.input.password = value,
            FormField::ConfirmPassword => self.input.confirm_password = value,
        }
        self.field_errors.clear(field);
    }

    /// Validate and enter [`FormPhase::Submitting`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmitOutcome::Busy`] unless the form is idle and
    /// [`SubmitOutcome::Invalid`] when any field fails validation.
    pub fn begin_submit(&mut self) -> Result<Registration, SubmitOutcome> {
        if self.phase != FormPhase::Idle {
            return Err(SubmitOutcome::Busy);
        }
        self.error = None;
        match Registration::try_from_input(&self.input) {
            Ok(registration) => {
                self.field_errors = FieldErrors::new();
                self.phase = FormPhase::Submitting;
                Ok(registration)
            }
            Err(errors) => {
                debug!(%errors, "registration form rejected");
                self.field_errors = errors;
                Err(SubmitOutcome::Invalid)
            }
        }
    }

    /// Apply the store's answer to a form in [`FormPhase::Submitting`].
    ///
    /// On success the form enters [`FormPhase::Success`] and
    /// `switch_to_sign_in` runs once, [`REDIRECT_DELAY`] later, on the
    /// current Tokio runtime. Any other phase yields
    /// [`SubmitOutcome::Busy`] and schedules nothing.
    pub fn complete_sign_up<F>(
        &mut self,
        result: Result<Identity, IdentityServiceError>,
        switch_to_sign_in: F,
    ) -> SubmitOutcome
    where
        F: FnOnce() + Send + 'static,
    {
        if self.phase != FormPhase::Submitting {
            return SubmitOutcome::Busy;
        }
        match result {
            Ok(_) => {
                self.phase = FormPhase::Success;
                tokio::spawn(async move {
                    sleep(REDIRECT_DELAY).await;
                    switch_to_sign_in();
                });
                SubmitOutcome::AccountCreated
            }
            Err(error) => {
                self.phase = FormPhase::Idle;
                self.error = Some(top_level_message(&error, SIGN_UP_FALLBACK));
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, call [`SessionStore::sign_up`] and apply the result.
    pub async fn submit<F>(&mut self, store: &SessionStore, switch_to_sign_in: F) -> SubmitOutcome
    where
        F: FnOnce() + Send + 'static,
    {
        let registration = match self.begin_submit() {
            Ok(registration) => registration,
            Err(outcome) => return outcome,
        };
        let result = store.sign_up(&registration).await;
        self.complete_sign_up(result, switch_to_sign_in)
    }
}
