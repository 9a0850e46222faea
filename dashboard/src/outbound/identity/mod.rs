//! Identity service outbound adapters.
//!
//! [`HttpIdentityService`] implements the `IdentityService` port over the
//! GoTrue-style REST API. The access token it receives is kept in a
//! [`SessionTokenStore`] so the session survives restarts when file-backed.

mod dto;
mod http_service;
mod token_store;

pub use http_service::HttpIdentityService;
pub use token_store::{FileTokenStore, MemoryTokenStore, SessionTokenStore, TokenStoreError};
