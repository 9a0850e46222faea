//! View model for the signed-in shell.

use crate::domain::AuthenticatedSession;

/// What the navigation bar and welcome panel show for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    /// Welcome heading, e.g. `Olá, Ana!`.
    pub greeting: String,
    /// Name on the user button.
    pub user_label: String,
    /// Email shown inside the profile menu.
    pub email: String,
    /// Whether the profile menu is showing.
    pub menu_open: bool,
}

impl DashboardView {
    /// Derive the view model from a session.
    pub fn from_session(session: &AuthenticatedSession, menu_open: bool) -> Self {
        let name = session.display_name();
        Self {
            greeting: format!("Olá, {name}!"),
            user_label: name.to_owned(),
            email: session.display_email().to_owned(),
            menu_open,
        }
    }
}
