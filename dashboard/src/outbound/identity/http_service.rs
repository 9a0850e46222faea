//! Reqwest-backed identity service adapter.
//!
//! This adapter owns transport details only: endpoint layout, bearer and API
//! key headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::warn;
use zeroize::Zeroizing;

use super::dto::{
    ErrorBodyDto, PasswordGrantDto, ProfileRowDto, SignUpMetadataDto, SignUpRequestDto,
    SignUpResponseDto, TokenResponseDto, UserDto,
};
use super::token_store::SessionTokenStore;
use crate::domain::ports::{IdentityService, IdentityServiceError};
use crate::domain::{Credentials, Identity, Profile, Registration, UserId};

const API_KEY_HEADER: &str = "apikey";

/// Identity service adapter speaking the GoTrue auth API plus the REST
/// profiles table.
pub struct HttpIdentityService {
    client: Client,
    base: Url,
    api_key: Option<Zeroizing<String>>,
    tokens: Arc<dyn SessionTokenStore>,
}

impl fmt::Debug for HttpIdentityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIdentityService")
            .field("base", &self.base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpIdentityService {
    /// Build an adapter rooted at `base` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        tokens: Arc<dyn SessionTokenStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            api_key: None,
            tokens,
        })
    }

    /// Send `api_key` in the `apikey` header of every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Zeroizing::new(api_key.into()));
        self
    }

    /// Root every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityServiceError> {
        self.base.join(path).map_err(|error| {
            IdentityServiceError::transport(format!("invalid endpoint {path}: {error}"))
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.as_str()),
            None => builder,
        }
    }

    fn stored_token(&self) -> Result<Option<Zeroizing<String>>, IdentityServiceError> {
        self.tokens
            .load()
            .map_err(|error| IdentityServiceError::transport(error.to_string()))
    }

    fn remember(&self, token: &str) {
        if let Err(error) = self.tokens.save(token) {
            warn!(%error, "could not persist session token");
        }
    }

    fn forget(&self) {
        if let Err(error) = self.tokens.clear() {
            warn!(%error, "could not clear session token");
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, IdentityServiceError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, IdentityServiceError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = self
            .send(self.request(Method::POST, url).json(&PasswordGrantDto {
                email: credentials.email(),
                password: credentials.password(),
            }))
            .await?;

        let session: TokenResponseDto = decode(&body, "token response")?;
        let access_token = Zeroizing::new(session.access_token);
        self.remember(access_token.as_str());
        session
            .user
            .into_identity()
            .map_err(IdentityServiceError::decode)
    }

    async fn create_account(
        &self,
        registration: &Registration,
    ) -> Result<Identity, IdentityServiceError> {
        let url = self.endpoint("auth/v1/signup")?;
        let body = self
            .send(self.request(Method::POST, url).json(&SignUpRequestDto {
                email: registration.email(),
                password: registration.password(),
                data: SignUpMetadataDto {
                    nome: registration.name(),
                },
            }))
            .await?;

        // A session issued here is discarded: new accounts sign in explicitly.
        let response: SignUpResponseDto = decode(&body, "sign-up response")?;
        response
            .into_user()
            .into_identity()
            .map_err(IdentityServiceError::decode)
    }

    async fn terminate_session(&self) -> Result<(), IdentityServiceError> {
        let Some(token) = self.stored_token()? else {
            return Ok(());
        };
        let url = self.endpoint("auth/v1/logout")?;
        let outcome = self
            .send(self.request(Method::POST, url).bearer_auth(token.as_str()))
            .await
            .map(drop);
        self.forget();
        outcome
    }

    async fn current_session(&self) -> Result<Option<Identity>, IdentityServiceError> {
        let Some(token) = self.stored_token()? else {
            return Ok(None);
        };
        let url = self.endpoint("auth/v1/user")?;
        let body = match self
            .send(self.request(Method::GET, url).bearer_auth(token.as_str()))
            .await
        {
            Ok(body) => body,
            Err(IdentityServiceError::Unauthenticated { .. }) => {
                self.forget();
                return Ok(None);
            }
            Err(error) => return Err(error),
        };

        let user: UserDto = decode(&body, "user response")?;
        user.into_identity()
            .map(Some)
            .map_err(IdentityServiceError::decode)
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, IdentityServiceError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "nome,email");
        let request = match self.stored_token()? {
            Some(token) => self.request(Method::GET, url).bearer_auth(token.as_str()),
            None => self.request(Method::GET, url),
        };
        let body = self.send(request).await?;

        let rows: Vec<ProfileRowDto> = decode(&body, "profile rows")?;
        rows.into_iter()
            .next()
            .map(ProfileRowDto::into_profile)
            .ok_or_else(|| IdentityServiceError::not_found(format!("no profile for {user_id}")))
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, IdentityServiceError> {
    serde_json::from_slice(body)
        .map_err(|error| IdentityServiceError::decode(format!("invalid {what}: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> IdentityServiceError {
    if error.is_timeout() {
        IdentityServiceError::timeout(error.to_string())
    } else {
        IdentityServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityServiceError {
    let message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::message)
        .unwrap_or_else(|| {
            let preview = body_preview(body);
            if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {preview}", status.as_u16())
            }
        });

    match status {
        StatusCode::UNAUTHORIZED => IdentityServiceError::unauthenticated(message),
        StatusCode::NOT_FOUND => IdentityServiceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityServiceError::timeout(message)
        }
        _ if status.is_client_error() => IdentityServiceError::rejected(message),
        _ => IdentityServiceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
        format!("{preview}...")
    } else {
        compact
    }
}
