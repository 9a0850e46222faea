//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **identity**: reqwest-backed identity service and access token storage.
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no business logic.

pub mod identity;
