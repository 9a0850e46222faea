//! Headless core of the SGG farm-management dashboard.
//!
//! Validates sign-in and registration input, owns the observable session
//! and maps it onto the screens a renderer draws. The identity backend sits
//! behind [`domain::ports::IdentityService`].

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

pub use settings::DashboardSettings;
