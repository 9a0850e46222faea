//! Account identity and profile records owned by the identity service.
//!
//! The dashboard caches these for the lifetime of an authenticated session
//! only; they are never persisted locally.

use std::fmt;

use uuid::Uuid;

/// Label shown in place of a name when no profile name is known.
pub const ANONYMOUS_LABEL: &str = "Usuário";

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier was not a canonical UUID string.
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// Stable account identifier issued by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdValidationError::Invalid);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserIdValidationError::Invalid)?;
        Ok(Self(parsed, raw.to_owned()))
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Authenticated account as reported by the identity service.
///
/// ## Invariants
/// - `id` is a valid UUID.
/// - `name` is the display name captured at registration, when the service
///   reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: UserId,
    email: String,
    name: Option<String>,
}

impl Identity {
    /// Build an identity without a display name.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
        }
    }

    /// Attach the display name reported alongside the account.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Account identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Account email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name from account metadata, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Profile row displayed by the navbar and dashboard greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    email: String,
}

impl Profile {
    /// Build a profile from its display fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}
