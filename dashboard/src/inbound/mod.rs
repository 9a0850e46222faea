//! Inbound adapters: the state a renderer drives and draws.
//!
//! Nothing here renders. Forms and views expose plain data plus the
//! operations a UI binds to its controls.

pub mod forms;
pub mod view;
