//! Authentication inputs: raw form fields and the validated payloads built
//! from them.
//!
//! Raw inputs hold whatever the user typed. Validated payloads can only be
//! built through the validator, so a [`Credentials`] or [`Registration`]
//! reaching the session store is known to satisfy the field rules.

use std::fmt;

use zeroize::Zeroizing;

use super::validation::{
    FieldErrors, FormField, validate_confirmation, validate_email, validate_name,
    validate_password,
};

/// Raw sign-in form fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignInInput {
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl SignInInput {
    /// Run every sign-in field check.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.record(FormField::Email, validate_email(&self.email));
        errors.record(FormField::Password, validate_password(&self.password));
        errors
    }
}

impl fmt::Debug for SignInInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw registration form fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    /// Display name as typed.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
    /// Password confirmation as typed.
    pub confirm_password: String,
}

impl RegistrationInput {
    /// Run every registration field check.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.record(FormField::Name, validate_name(&self.name));
        errors.record(FormField::Email, validate_email(&self.email));
        errors.record(FormField::Password, validate_password(&self.password));
        errors.record(
            FormField::ConfirmPassword,
            validate_confirmation(&self.password, &self.confirm_password),
        );
        errors
    }
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` matches `local@domain.tld`.
/// - `password` is at least six characters; it is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw inputs and build credentials.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{Credentials, FieldError, FormField};
    ///
    /// let creds = Credentials::try_from_parts("ana@granja.com", "123456").unwrap();
    /// assert_eq!(creds.email(), "ana@granja.com");
    ///
    /// let errors = Credentials::try_from_parts("", "abc").unwrap_err();
    /// assert_eq!(errors.get(FormField::Email), Some(FieldError::Required));
    /// ```
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldErrors> {
        Self::try_from_input(&SignInInput {
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Validate a sign-in form's fields and build credentials.
    pub fn try_from_input(input: &SignInInput) -> Result<Self, FieldErrors> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            email: input.email.clone(),
            password: Zeroizing::new(input.password.clone()),
        })
    }

    /// Account email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Account password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated account registration.
///
/// ## Invariants
/// - `name` is trimmed and at least three characters.
/// - `email` matches `local@domain.tld`.
/// - `password` is at least six characters and matched its confirmation.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration form's fields and build the payload.
    pub fn try_from_input(input: &RegistrationInput) -> Result<Self, FieldErrors> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            name: input.name.trim().to_owned(),
            email: input.email.clone(),
            password: Zeroizing::new(input.password.clone()),
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Account email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Account password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for payload construction.
    use super::*;
    use crate::domain::FieldError;
    use rstest::rstest;

    #[test]
    fn blank_email_and_short_password_report_both_fields() {
        let errors = Credentials::try_from_parts("", "abc").expect_err("invalid credentials");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::Email), Some(FieldError::Required));
        assert_eq!(
            errors.get(FormField::Password),
            Some(FieldError::TooShort { min: 6 })
        );
    }

    #[rstest]
    #[case("a@b.com", "123456")]
    #[case("ana@granja.com.br", "correct horse battery staple")]
    fn valid_credentials_keep_inputs_verbatim(#[case] email: &str, #[case] password: &str) {
        let creds = Credentials::try_from_parts(email, password).expect("valid credentials");
        assert_eq!(creds.email(), email);
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn registration_trims_the_name_only() {
        let input = RegistrationInput {
            name: "  Ana Souza ".to_owned(),
            email: "ana@granja.com".to_owned(),
            password: " senha1".to_owned(),
            confirm_password: " senha1".to_owned(),
        };
        let registration = Registration::try_from_input(&input).expect("valid registration");
        assert_eq!(registration.name(), "Ana Souza");
        assert_eq!(registration.password(), " senha1");
    }

    #[test]
    fn registration_reports_every_invalid_field() {
        let errors = Registration::try_from_input(&RegistrationInput::default())
            .expect_err("empty registration");
        let fields = errors.iter().map(|(field, _)| field).collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                FormField::Name,
                FormField::Email,
                FormField::Password,
                FormField::ConfirmPassword
            ]
        );
        assert!(errors.iter().all(|(_, error)| error == FieldError::Required));
    }

    #[test]
    fn debug_output_never_contains_the_password() {
        let creds = Credentials::try_from_parts("a@b.com", "hunter22").expect("valid");
        assert!(!format!("{creds:?}").contains("hunter22"));
        let input = SignInInput {
            email: "a@b.com".to_owned(),
            password: "hunter22".to_owned(),
        };
        assert!(!format!("{input:?}").contains("hunter22"));
    }
}
