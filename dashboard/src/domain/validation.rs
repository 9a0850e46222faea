//! Field-level validation for the sign-in and registration forms.
//!
//! Every check is a pure function of the raw field text. Results are
//! collected into [`FieldErrors`]; an empty set means the form may be
//! submitted. Lengths count Unicode scalar values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Minimum display name length in characters, after trimming.
pub const NAME_MIN: usize = 3;

/// Form inputs that can carry a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Registration display name.
    Name,
    /// Account email.
    Email,
    /// Account password.
    Password,
    /// Registration password confirmation.
    ConfirmPassword,
}

impl FormField {
    /// Stable identifier matching the form control id.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field is blank.
    Required,
    /// The email does not look like `local@domain.tld`.
    InvalidEmail,
    /// The field is shorter than `min` characters.
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The confirmation differs from the password.
    Mismatch,
}

impl FieldError {
    /// User-facing message for this error on `field`.
    pub fn message(self, field: FormField) -> String {
        match (self, field) {
            (Self::Required, FormField::Name) => "Nome é obrigatório".to_owned(),
            (Self::Required, FormField::Email) => "Email é obrigatório".to_owned(),
            (Self::Required, FormField::Password) => "Senha é obrigatória".to_owned(),
            (Self::Required, FormField::ConfirmPassword) => {
                "Confirmação de senha é obrigatória".to_owned()
            }
            (Self::InvalidEmail, _) => "Email inválido".to_owned(),
            (Self::TooShort { min }, FormField::Name) => {
                format!("Nome deve ter no mínimo {min} caracteres")
            }
            (Self::TooShort { min }, _) => format!("Senha deve ter no mínimo {min} caracteres"),
            (Self::Mismatch, _) => "As senhas não coincidem".to_owned(),
        }
    }
}

/// Field-to-error mapping; a missing entry means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, FieldError>);

impl FieldErrors {
    /// Empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` for `field` when present.
    pub fn record(&mut self, field: FormField, error: Option<FieldError>) {
        if let Some(error) = error {
            self.0.insert(field, error);
        }
    }

    /// Error currently attached to `field`.
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// User-facing message for `field`, if it is invalid.
    pub fn message(&self, field: FormField) -> Option<String> {
        self.get(field).map(|error| error.message(field))
    }

    /// Drop the error for `field`, returning whether one was present.
    pub fn clear(&mut self, field: FormField) -> bool {
        self.0.remove(&field).is_some()
    }

    /// True when every field is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Invalid fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .0
            .keys()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "invalid fields: {fields}")
    }
}

impl std::error::Error for FieldErrors {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Check an email address.
///
/// Blank input reports [`FieldError::Required`]; the format check runs on the
/// untrimmed value, so surrounding whitespace makes the address invalid.
///
/// # Examples
/// ```
/// use dashboard::domain::{FieldError, validate_email};
///
/// assert_eq!(validate_email("  "), Some(FieldError::Required));
/// assert_eq!(validate_email("ana@granja"), Some(FieldError::InvalidEmail));
/// assert_eq!(validate_email("ana@granja.com"), None);
/// ```
pub fn validate_email(email: &str) -> Option<FieldError> {
    if email.trim().is_empty() {
        Some(FieldError::Required)
    } else if !email_regex().is_match(email) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

/// Check a password: required, at least [`PASSWORD_MIN`] characters.
///
/// Length counts Unicode scalar values, so `"😀😀😀"` is three characters
/// and too short, even though it spans six UTF-16 code units. Passwords are
/// not trimmed.
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        Some(FieldError::Required)
    } else if password.chars().count() < PASSWORD_MIN {
        Some(FieldError::TooShort { min: PASSWORD_MIN })
    } else {
        None
    }
}

/// Check a password confirmation against the password, byte for byte.
pub fn validate_confirmation(password: &str, confirmation: &str) -> Option<FieldError> {
    if confirmation.is_empty() {
        Some(FieldError::Required)
    } else if password != confirmation {
        Some(FieldError::Mismatch)
    } else {
        None
    }
}

/// Check a display name: required and at least [`NAME_MIN`] characters once
/// trimmed. Characters are Unicode scalar values, as for passwords.
pub fn validate_name(name: &str) -> Option<FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some(FieldError::Required)
    } else if trimmed.chars().count() < NAME_MIN {
        Some(FieldError::TooShort { min: NAME_MIN })
    } else {
        None
    }
}
