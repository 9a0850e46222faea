//! Wire DTOs for the GoTrue-style auth API and the profiles table.
//!
//! Responses are decoded into these transport shapes first and mapped into
//! domain records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, Profile, UserId};

#[derive(Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Serialize)]
pub(super) struct SignUpRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: SignUpMetadataDto<'a>,
}

#[derive(Serialize)]
pub(super) struct SignUpMetadataDto<'a> {
    pub(super) nome: &'a str,
}

#[derive(Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: UserMetadataDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserMetadataDto {
    #[serde(default)]
    pub(super) nome: Option<String>,
}

/// Sign-up answers with a session when email confirmation is off and with the
/// bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(TokenResponseDto),
    User(UserDto),
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRowDto {
    #[serde(default)]
    pub(super) nome: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl UserDto {
    pub(super) fn into_identity(self) -> Result<Identity, String> {
        let id = UserId::new(&self.id).map_err(|error| format!("user id {:?}: {error}", self.id))?;
        let identity = Identity::new(id, self.email.unwrap_or_default());
        Ok(match self.user_metadata.nome {
            Some(name) if !name.trim().is_empty() => identity.with_name(name),
            _ => identity,
        })
    }
}

impl SignUpResponseDto {
    pub(super) fn into_user(self) -> UserDto {
        match self {
            Self::Session(session) => session.user,
            Self::User(user) => user,
        }
    }
}

impl ProfileRowDto {
    pub(super) fn into_profile(self) -> Profile {
        Profile::new(self.nome.unwrap_or_default(), self.email.unwrap_or_default())
    }
}

impl ErrorBodyDto {
    /// First non-blank message field, in the order the service fills them.
    pub(super) fn message(self) -> Option<String> {
        [self.error_description, self.msg, self.message, self.error]
            .into_iter()
            .flatten()
            .map(|text| text.trim().to_owned())
            .find(|text| !text.is_empty())
    }
}
